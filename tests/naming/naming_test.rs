//! Tests for identifier naming: inflection, abbreviation and the
//! per-role name builders.

use morphe_psql::naming::{
    abbreviate, column_name, enum_table_name, foreign_key_column_name, index_name,
    junction_table_name, pluralize, short_hash, singularize, snake_case, table_name, view_name,
    AbbreviateOptions, MAX_IDENTIFIER_LENGTH,
};

// ============================================================================
// Inflection
// ============================================================================

#[test]
fn test_snake_case() {
    assert_eq!(snake_case("ContactInfo"), "contact_info");
    assert_eq!(snake_case("ID"), "id");
    assert_eq!(snake_case("Email"), "email");
}

#[test]
fn test_pluralize_last_segment_only() {
    assert_eq!(pluralize("person"), "people");
    assert_eq!(pluralize("contact_person"), "contact_people");
    assert_eq!(pluralize("search_index"), "search_indices");
    assert_eq!(pluralize("tag"), "tags");
}

#[test]
fn test_singularize_reverses_irregulars() {
    assert_eq!(singularize("people"), "person");
    assert_eq!(singularize("search_indices"), "search_index");
    assert_eq!(singularize("children"), "child");
}

// ============================================================================
// Builders
// ============================================================================

#[test]
fn test_table_names() {
    assert_eq!(table_name("Person"), "people");
    assert_eq!(table_name("Child"), "children");
    assert_eq!(table_name("ContactInfo"), "contact_infos");
    assert_eq!(enum_table_name("Role"), "roles");
}

#[test]
fn test_reference_names() {
    assert_eq!(column_name("ContactInfo"), "contact_info");
    assert_eq!(foreign_key_column_name("ContactInfo", "ID"), "contact_info_id");
    assert_eq!(junction_table_name("Person", "Tag"), "person_tags");
    assert_eq!(view_name("ContactInfo", "_entities"), "contact_infos_entities");
    assert_eq!(index_name("people", &["contact_info_id"]), "idx_people_contact_info_id");
}

// ============================================================================
// Abbreviation
// ============================================================================

fn long_identifier(prefix: &str, segments: usize) -> String {
    let body = vec!["segment"; segments].join("_");
    format!("{}_{}", prefix, body)
}

#[test]
fn test_short_identifiers_unchanged() {
    let name = "fk_people_contact_info_id";
    assert_eq!(abbreviate(name, AbbreviateOptions::HASHED), name);
    assert_eq!(abbreviate(name, AbbreviateOptions::TRUNCATED), name);
}

#[test]
fn test_segment_abbreviation_keeps_role_prefix() {
    let name = "fk_organizations_administrative_departments_responsible_managers_id";
    assert!(name.len() > MAX_IDENTIFIER_LENGTH);
    assert_eq!(
        abbreviate(name, AbbreviateOptions::HASHED),
        "fk_or_ad_de_re_ma_id"
    );
}

#[test]
fn test_hashed_fallback() {
    let name = long_identifier("idx", 30);
    let result = abbreviate(&name, AbbreviateOptions::HASHED);

    assert_eq!(result.len(), MAX_IDENTIFIER_LENGTH);
    assert!(result.starts_with("idx_se_se"));
    assert!(result.ends_with(&format!("_{}", short_hash(&name))));
}

#[test]
fn test_truncated_fallback() {
    let name = long_identifier("uk", 30);
    let result = abbreviate(&name, AbbreviateOptions::TRUNCATED);

    assert_eq!(result.len(), MAX_IDENTIFIER_LENGTH);
    assert!(result.starts_with("uk_se_se"));
}

#[test]
fn test_hash_distinguishes_long_names() {
    let a = long_identifier("fk", 30);
    let b = format!("{}_x", a);
    assert_ne!(
        abbreviate(&a, AbbreviateOptions::HASHED),
        abbreviate(&b, AbbreviateOptions::HASHED)
    );
}

#[test]
fn test_abbreviation_is_deterministic() {
    let name = long_identifier("fk", 40);
    let first = abbreviate(&name, AbbreviateOptions::HASHED);
    for _ in 0..5 {
        assert_eq!(abbreviate(&name, AbbreviateOptions::HASHED), first);
    }
    assert_eq!(short_hash(&name).len(), 8);
}

#[test]
fn test_long_table_name_fits() {
    let model = "VeryLongOrganizationalResponsibilityAssignmentHistoricalSnapshotRecord";
    let name = table_name(model);
    assert!(name.len() <= MAX_IDENTIFIER_LENGTH);
    assert_eq!(name, table_name(model));
}
