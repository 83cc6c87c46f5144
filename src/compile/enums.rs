//! Enum compilation: a lookup table plus seed rows.

use serde::Serialize;
use tracing::debug;

use super::{require_schema, CompileError};
use crate::config::EnumsConfig;
use crate::model::{sorted_entries, Enum, SpecKind};
use crate::naming;
use crate::sql::{Column, InsertStatement, PsqlType, Table, UniqueConstraint};

/// Lookup table and the rows that populate it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumTable {
    pub table: Table,
    /// One row per entry, in key order.
    pub seed: InsertStatement,
}

/// Compile an enum into `{id, key, value}` plus one seed row per entry.
///
/// Values are stored as text regardless of the enum's declared type; the
/// declared type only constrains which literals are accepted.
pub fn compile_enum(config: &EnumsConfig, enumeration: &Enum) -> Result<EnumTable, CompileError> {
    if enumeration.name.trim().is_empty() {
        return Err(CompileError::EmptyEnumName);
    }
    if enumeration.entries.is_empty() {
        return Err(CompileError::NoEnumEntries {
            name: enumeration.name.clone(),
        });
    }
    require_schema(&config.schema, SpecKind::Enum)?;

    let entries = sorted_entries(&enumeration.entries);
    if let Some((key, _)) = entries
        .iter()
        .find(|(_, value)| !value.matches(enumeration.value_type))
    {
        return Err(CompileError::EnumValueTypeMismatch {
            name: enumeration.name.clone(),
            entry: (*key).clone(),
            expected: enumeration.value_type,
        });
    }

    let table_name = naming::enum_table_name(&enumeration.name);
    let key_columns = ["key".to_string()];
    let table = Table::new(&config.schema, &table_name)
        .column(Column::new("id", PsqlType::Serial).primary_key())
        .column(Column::new("key", PsqlType::Text).not_null())
        .column(Column::new("value", PsqlType::Text).not_null())
        .unique(UniqueConstraint::new(
            naming::unique_constraint_name(&table_name, &key_columns),
            key_columns.to_vec(),
        ));

    let seed = entries.into_iter().fold(
        InsertStatement::new(
            &config.schema,
            &table_name,
            vec!["key".to_string(), "value".to_string()],
        ),
        |seed, (key, value)| seed.row(vec![key.clone(), value.to_literal()]),
    );

    debug!(
        enumeration = %enumeration.name,
        table = %table.qualified_name(),
        entries = seed.rows.len(),
        "Compiled enum"
    );

    Ok(EnumTable { table, seed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumType, EnumValue};
    use crate::sql::test_utils::validate_sql;
    use insta::assert_snapshot;

    fn role() -> Enum {
        Enum::new("Role", EnumType::String)
            .entry("Viewer", EnumValue::String("VIEWER".into()))
            .entry("Admin", EnumValue::String("ADMIN".into()))
            .entry("Editor", EnumValue::String("EDITOR".into()))
    }

    #[test]
    fn test_compile_enum() {
        let compiled = compile_enum(&EnumsConfig::default(), &role()).unwrap();

        let table_sql = compiled.table.to_sql();
        assert_snapshot!(table_sql, @r"
        CREATE TABLE IF NOT EXISTS public.roles (
          id SERIAL PRIMARY KEY,
          key TEXT NOT NULL,
          value TEXT NOT NULL,
          CONSTRAINT uk_roles_key UNIQUE (key)
        );
        ");
        validate_sql(&table_sql).unwrap();

        let seed_sql = compiled.seed.to_sql();
        assert_snapshot!(seed_sql, @r"
        INSERT INTO public.roles (key, value) VALUES ('Admin', 'ADMIN');
        INSERT INTO public.roles (key, value) VALUES ('Editor', 'EDITOR');
        INSERT INTO public.roles (key, value) VALUES ('Viewer', 'VIEWER');
        ");
        validate_sql(&seed_sql).unwrap();
    }

    #[test]
    fn test_numeric_values_rendered_as_text() {
        let priority = Enum::new("Priority", EnumType::Float)
            .entry("Low", EnumValue::Integer(1))
            .entry("High", EnumValue::Float(2.5));
        let compiled = compile_enum(&EnumsConfig::default(), &priority).unwrap();

        assert_eq!(
            compiled.seed.rows,
            vec![
                vec!["High".to_string(), "2.5".to_string()],
                vec!["Low".to_string(), "1".to_string()],
            ]
        );
    }

    #[test]
    fn test_value_type_mismatch() {
        let bad = Enum::new("Level", EnumType::Integer)
            .entry("One", EnumValue::Integer(1))
            .entry("Two", EnumValue::String("2".into()));
        let err = compile_enum(&EnumsConfig::default(), &bad).unwrap_err();
        assert!(matches!(
            err,
            CompileError::EnumValueTypeMismatch { ref entry, .. } if entry == "Two"
        ));
    }

    #[test]
    fn test_validation_errors() {
        let config = EnumsConfig::default();

        let err = compile_enum(&config, &Enum::new("", EnumType::String)).unwrap_err();
        assert!(matches!(err, CompileError::EmptyEnumName));

        let err = compile_enum(&config, &Enum::new("Role", EnumType::String)).unwrap_err();
        assert!(matches!(err, CompileError::NoEnumEntries { .. }));

        let config = EnumsConfig {
            schema: " ".into(),
        };
        let err = compile_enum(&config, &role()).unwrap_err();
        assert!(matches!(err, CompileError::EmptySchema { kind: SpecKind::Enum }));
    }
}
