//! Tests for lowering models to tables.

use morphe_psql::compile::{compile_model, CompileError};
use morphe_psql::config::ModelsConfig;
use morphe_psql::model::{FieldType, InMemoryRegistry, Model, RelationKind};
use morphe_psql::sql::{PsqlType, ReferentialAction, Table};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

fn assert_valid_sql(sql: &str) {
    if let Err(e) = Parser::parse_sql(&PostgreSqlDialect {}, sql) {
        panic!("Invalid SQL: {}\nSQL: {}", e, sql);
    }
}

fn column_type(table: &Table, column: &str) -> PsqlType {
    table
        .get_column(column)
        .unwrap_or_else(|| panic!("missing column {column} in {}", table.name))
        .data_type
}

fn blog_registry() -> InMemoryRegistry {
    InMemoryRegistry::new()
        .with_model(
            Model::new("Person")
                .field("ID", FieldType::AutoIncrement)
                .field_with("Name", FieldType::String, &["mandatory"])
                .field("Nickname", FieldType::String)
                .identifier("primary", &["ID"])
                .relation("Post", RelationKind::HAS_MANY),
        )
        .with_model(
            Model::new("Post")
                .field("ID", FieldType::Uuid)
                .field_with("Title", FieldType::String, &["mandatory"])
                .field("PublishedAt", FieldType::Time)
                .identifier("primary", &["ID"])
                .identifier("title", &["Title"])
                .aliased_relation("Author", RelationKind::FOR_ONE, "Person")
                .relation("Tag", RelationKind::FOR_MANY),
        )
        .with_model(
            Model::new("Tag")
                .field("Label", FieldType::String)
                .identifier("primary", &["Label"]),
        )
}

fn model(registry: &InMemoryRegistry, name: &str) -> Model {
    use morphe_psql::model::Registry;
    registry.model(name).unwrap().clone()
}

// ============================================================================
// Columns and types
// ============================================================================

#[test]
fn test_every_field_type_has_a_column() {
    let all = Model::new("Sample")
        .field("A", FieldType::AutoIncrement)
        .field("B", FieldType::Boolean)
        .field("C", FieldType::Date)
        .field("D", FieldType::Float)
        .field("E", FieldType::Integer)
        .field("F", FieldType::Protected)
        .field("G", FieldType::Sealed)
        .field("H", FieldType::String)
        .field("I", FieldType::Time)
        .field("J", FieldType::Uuid)
        .identifier("primary", &["A"]);
    let registry = InMemoryRegistry::new().with_model(all.clone());

    let tables = compile_model(&ModelsConfig::default(), &registry, &all).unwrap();
    let table = &tables.table;

    let types: Vec<PsqlType> = table.columns.iter().map(|c| c.data_type).collect();
    assert_eq!(
        types,
        vec![
            PsqlType::Serial,
            PsqlType::Boolean,
            PsqlType::Date,
            PsqlType::DoublePrecision,
            PsqlType::Integer,
            PsqlType::Text,
            PsqlType::Text,
            PsqlType::Text,
            PsqlType::TimestampTz,
            PsqlType::Uuid,
        ]
    );
    assert_valid_sql(&table.to_sql());
}

#[test]
fn test_nullability_follows_primary_and_mandatory() {
    let registry = blog_registry();
    let person = model(&registry, "Person");
    let tables = compile_model(&ModelsConfig::default(), &registry, &person).unwrap();
    let table = &tables.table;

    assert!(table.get_column("id").unwrap().primary_key);
    assert!(!table.get_column("name").unwrap().nullable);
    assert!(table.get_column("nickname").unwrap().nullable);
    assert_eq!(table.primary_key_columns(), vec!["id"]);
}

// ============================================================================
// Relations
// ============================================================================

#[test]
fn test_for_one_reference_uses_foreign_type() {
    let registry = blog_registry();
    let post = model(&registry, "Post");
    let tables = compile_model(&ModelsConfig::default(), &registry, &post).unwrap();
    let table = &tables.table;

    assert_eq!(column_type(table, "author_id"), PsqlType::Integer);
    let fk = table
        .foreign_keys
        .iter()
        .find(|fk| fk.columns == ["author_id"])
        .unwrap();
    assert_eq!(fk.name, "fk_posts_author_id");
    assert_eq!(fk.ref_table, "people");
    assert_eq!(fk.ref_columns, vec!["id"]);
    assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
    assert!(table
        .indices
        .iter()
        .any(|idx| idx.name == "idx_posts_author_id" && idx.columns == ["author_id"]));

    assert_valid_sql(&table.to_sql());
}

#[test]
fn test_for_many_junction_types_follow_keys() {
    let registry = blog_registry();
    let post = model(&registry, "Post");
    let tables = compile_model(&ModelsConfig::default(), &registry, &post).unwrap();

    assert_eq!(tables.junction_tables.len(), 1);
    let junction = &tables.junction_tables[0];
    assert_eq!(junction.name, "post_tags");
    assert_eq!(column_type(junction, "id"), PsqlType::Serial);
    assert_eq!(column_type(junction, "post_id"), PsqlType::Uuid);
    assert_eq!(column_type(junction, "tag_label"), PsqlType::Text);
    assert_eq!(junction.foreign_keys.len(), 2);
    assert_eq!(junction.indices.len(), 2);
    assert_eq!(
        junction.unique_constraints[0].columns,
        vec!["post_id", "tag_label"]
    );

    for table in tables.tables() {
        assert_valid_sql(&table.to_sql());
    }
}

#[test]
fn test_has_many_emits_nothing_on_owner() {
    let registry = blog_registry();
    let person = model(&registry, "Person");
    let tables = compile_model(&ModelsConfig::default(), &registry, &person).unwrap();

    assert!(tables.table.foreign_keys.is_empty());
    assert!(tables.junction_tables.is_empty());
}

#[test]
fn test_secondary_identifier_unique() {
    let registry = blog_registry();
    let post = model(&registry, "Post");
    let tables = compile_model(&ModelsConfig::default(), &registry, &post).unwrap();

    let names: Vec<&str> = tables
        .table
        .unique_constraints
        .iter()
        .map(|u| u.name.as_str())
        .collect();
    assert_eq!(names, vec!["uk_posts_title"]);
}

#[test]
fn test_bigserial_config() {
    let registry = blog_registry();
    let config = ModelsConfig {
        schema: "blog".into(),
        use_bigserial: true,
    };

    let person = model(&registry, "Person");
    let tables = compile_model(&config, &registry, &person).unwrap();
    assert_eq!(tables.table.qualified_name(), "blog.people");
    assert_eq!(column_type(&tables.table, "id"), PsqlType::BigSerial);

    let post = model(&registry, "Post");
    let tables = compile_model(&config, &registry, &post).unwrap();
    assert_eq!(column_type(&tables.table, "author_id"), PsqlType::BigInt);
    assert_eq!(
        column_type(&tables.junction_tables[0], "id"),
        PsqlType::BigSerial
    );
    assert_eq!(tables.table.foreign_keys[0].ref_schema, "blog");
}

#[test]
fn test_reference_column_collision() {
    let target = Model::new("Owner")
        .field("ID", FieldType::AutoIncrement)
        .identifier("primary", &["ID"]);
    let source = Model::new("Pet")
        .field("ID", FieldType::AutoIncrement)
        .field("OwnerID", FieldType::Integer)
        .identifier("primary", &["ID"])
        .relation("Owner", RelationKind::FOR_ONE);
    let registry = InMemoryRegistry::new()
        .with_model(target)
        .with_model(source.clone());

    let err = compile_model(&ModelsConfig::default(), &registry, &source).unwrap_err();
    assert!(matches!(
        err,
        CompileError::DuplicateColumn { ref column, .. } if column == "owner_id"
    ));
}

#[test]
fn test_field_column_collision() {
    let person = Model::new("Person")
        .field("ID", FieldType::AutoIncrement)
        .field("FirstName", FieldType::String)
        .field("first_name", FieldType::Integer)
        .identifier("primary", &["ID"]);
    let registry = InMemoryRegistry::new().with_model(person.clone());

    let err = compile_model(&ModelsConfig::default(), &registry, &person).unwrap_err();
    match err {
        CompileError::DuplicateColumn { table, column } => {
            assert_eq!(table, "people");
            assert_eq!(column, "first_name");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_compilation_is_deterministic() {
    let registry = blog_registry();
    let post = model(&registry, "Post");
    let first = compile_model(&ModelsConfig::default(), &registry, &post).unwrap();

    for _ in 0..10 {
        let again = compile_model(&ModelsConfig::default(), &registry, &post).unwrap();
        assert_eq!(again, first);
    }
}
