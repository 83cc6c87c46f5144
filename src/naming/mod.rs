//! Naming engine: maps specification identifiers to SQL identifiers.
//!
//! Every builder returns an identifier of at most
//! [`MAX_IDENTIFIER_LENGTH`] bytes. Table, column and constraint names are
//! all abbreviated with collision hashing because each of them must stay
//! unique within its namespace.

mod abbreviate;
mod inflection;

pub use abbreviate::{abbreviate, short_hash, AbbreviateOptions, MAX_IDENTIFIER_LENGTH, ROLE_PREFIXES};
pub use inflection::{pluralize, pluralize_word, singularize, singularize_word, snake_case};

/// Table name for a model: pluralized snake_case.
///
/// # Examples
/// ```ignore
/// assert_eq!(table_name("Person"), "people");
/// assert_eq!(table_name("SearchIndex"), "search_indices");
/// ```
pub fn table_name(model_name: &str) -> String {
    abbreviate(&pluralize(&snake_case(model_name)), AbbreviateOptions::HASHED)
}

/// Table name for an enum lookup table.
pub fn enum_table_name(enum_name: &str) -> String {
    table_name(enum_name)
}

/// Column name for a field.
pub fn column_name(field_name: &str) -> String {
    abbreviate(&snake_case(field_name), AbbreviateOptions::HASHED)
}

/// Column referencing `target_field` on `target_model`,
/// e.g. `contact_info_id`.
pub fn foreign_key_column_name(target_model: &str, target_field: &str) -> String {
    let raw = format!("{}_{}", snake_case(target_model), snake_case(target_field));
    abbreviate(&raw, AbbreviateOptions::HASHED)
}

/// Junction table for a many-to-many association between two models,
/// e.g. `person_tags`.
pub fn junction_table_name(source_model: &str, target_model: &str) -> String {
    let raw = format!("{}_{}", snake_case(source_model), snake_case(target_model));
    abbreviate(&pluralize(&raw), AbbreviateOptions::HASHED)
}

/// View name for an entity: pluralized snake_case plus the configured suffix.
pub fn view_name(entity_name: &str, suffix: &str) -> String {
    let raw = format!("{}{}", pluralize(&snake_case(entity_name)), suffix);
    abbreviate(&raw, AbbreviateOptions::HASHED)
}

/// `fk_{table}_{columns}`
pub fn foreign_key_name<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    role_name("fk", table, columns)
}

/// `uk_{table}_{columns}`
pub fn unique_constraint_name<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    role_name("uk", table, columns)
}

/// `idx_{table}_{columns}`
pub fn index_name<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    role_name("idx", table, columns)
}

fn role_name<S: AsRef<str>>(role: &str, table: &str, columns: &[S]) -> String {
    let mut raw = format!("{}_{}", role, table);
    for column in columns {
        raw.push('_');
        raw.push_str(column.as_ref());
    }
    abbreviate(&raw, AbbreviateOptions::HASHED)
}
