//! Tests for lowering enums to lookup tables and seed rows.

use morphe_psql::compile::{compile_enum, CompileError};
use morphe_psql::config::EnumsConfig;
use morphe_psql::model::{Enum, EnumType, EnumValue};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

fn assert_valid_sql(sql: &str) {
    if let Err(e) = Parser::parse_sql(&PostgreSqlDialect {}, sql) {
        panic!("Invalid SQL: {}\nSQL: {}", e, sql);
    }
}

fn role() -> Enum {
    Enum::new("UserRole", EnumType::String)
        .entry("Viewer", EnumValue::String("viewer".into()))
        .entry("Editor", EnumValue::String("editor".into()))
        .entry("Admin", EnumValue::String("admin".into()))
}

#[test]
fn test_lookup_table_shape() {
    let compiled = compile_enum(&EnumsConfig::default(), &role()).unwrap();
    let table = &compiled.table;

    assert_eq!(table.qualified_name(), "public.user_roles");
    let columns: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["id", "key", "value"]);
    assert_eq!(table.primary_key_columns(), vec!["id"]);
    assert_eq!(table.unique_constraints[0].name, "uk_user_roles_key");
    assert!(table.foreign_keys.is_empty());
}

#[test]
fn test_seed_rows_in_key_order() {
    let compiled = compile_enum(&EnumsConfig::default(), &role()).unwrap();

    let keys: Vec<&str> = compiled.seed.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(keys, vec!["Admin", "Editor", "Viewer"]);

    let sql = format!("{}\n{}", compiled.table.to_sql(), compiled.seed.to_sql());
    assert_valid_sql(&sql);
}

#[test]
fn test_quotes_escaped_in_seed() {
    let quoted = Enum::new("Greeting", EnumType::String)
        .entry("Casual", EnumValue::String("how's it going".into()));
    let compiled = compile_enum(&EnumsConfig::default(), &quoted).unwrap();

    let sql = compiled.seed.to_sql();
    assert!(sql.contains("'how''s it going'"));
    assert_valid_sql(&sql);
}

#[test]
fn test_integer_enum() {
    let level = Enum::new("Level", EnumType::Integer)
        .entry("Low", EnumValue::Integer(1))
        .entry("High", EnumValue::Integer(10));
    let compiled = compile_enum(&EnumsConfig { schema: "ref".into() }, &level).unwrap();

    assert_eq!(compiled.seed.schema, "ref");
    assert_eq!(compiled.seed.rows[0], vec!["High", "10"]);
    assert_eq!(compiled.seed.rows[1], vec!["Low", "1"]);
}

#[test]
fn test_float_declared_rejects_strings() {
    let bad = Enum::new("Ratio", EnumType::Float).entry("Half", EnumValue::String("0.5".into()));
    let err = compile_enum(&EnumsConfig::default(), &bad).unwrap_err();
    assert!(matches!(
        err,
        CompileError::EnumValueTypeMismatch {
            expected: EnumType::Float,
            ..
        }
    ));
}
