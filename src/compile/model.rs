//! Model compilation: one table per model plus a junction table per
//! `ForMany` relation.
//!
//! Columns follow field names in sorted order, then one reference column
//! per `ForOne` relation in sorted relation order. `Has*` relations are
//! validated but produce nothing; the owning side carries the reference.

use serde::Serialize;
use tracing::debug;

use super::{require_schema, CompileError};
use crate::config::ModelsConfig;
use crate::model::{
    sorted_entries, Model, ModelField, ModelRelation, Registry, SpecKind, MANDATORY_ATTRIBUTE,
    PRIMARY_IDENTIFIER,
};
use crate::naming;
use crate::sql::{
    Column, ForeignKey, Index, PsqlType, ReferentialAction, Table, TypeMap, UniqueConstraint,
};

/// Tables produced by one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelTables {
    pub table: Table,
    /// Junction tables for `ForMany` relations, in relation-name order.
    pub junction_tables: Vec<Table>,
}

impl ModelTables {
    /// Every table, primary table first.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        std::iter::once(&self.table).chain(self.junction_tables.iter())
    }

    pub fn into_tables(self) -> Vec<Table> {
        let mut tables = Vec::with_capacity(1 + self.junction_tables.len());
        tables.push(self.table);
        tables.extend(self.junction_tables);
        tables
    }
}

/// Compile a model into its table and junction tables.
pub fn compile_model(
    config: &ModelsConfig,
    registry: &dyn Registry,
    model: &Model,
) -> Result<ModelTables, CompileError> {
    validate_model(model)?;
    require_schema(&config.schema, SpecKind::Model)?;

    let local = TypeMap::local(config.use_bigserial);
    let foreign = TypeMap::foreign(config.use_bigserial);
    let table_name = naming::table_name(&model.name);
    let primary_fields = model
        .primary_identifier()
        .map(|id| id.fields.as_slice())
        .unwrap_or_default();

    let mut table = Table::new(&config.schema, &table_name);

    for (field_name, field) in sorted_entries(&model.fields) {
        let data_type = column_type(local, &model.name, field_name, field)?;
        let name = naming::column_name(field_name);
        if table.get_column(&name).is_some() {
            return Err(CompileError::DuplicateColumn {
                table: table_name,
                column: name,
            });
        }
        let mut column = Column::new(name, data_type);
        if primary_fields.contains(field_name) {
            column = column.primary_key();
        } else if field.has_attribute(MANDATORY_ATTRIBUTE) {
            column = column.not_null();
        }
        table = table.column(column);
    }

    for (identifier_name, identifier) in sorted_entries(&model.identifiers) {
        if identifier_name == PRIMARY_IDENTIFIER {
            continue;
        }
        let columns: Vec<String> = identifier
            .fields
            .iter()
            .map(|f| naming::column_name(f))
            .collect();
        let name = naming::unique_constraint_name(&table_name, &columns);
        table = table.unique(UniqueConstraint::new(name, columns));
    }

    let mut junction_tables = Vec::new();
    for (relation_name, relation) in sorted_entries(&model.related) {
        let target = resolve_target(registry, model, relation_name, relation)?;
        if !relation.kind.is_for() {
            continue;
        }

        let (target_field, target_def) = single_primary_field(target)?;
        let target_type = column_type(foreign, &target.name, target_field, target_def)?;

        if relation.kind.is_one() {
            let column = naming::foreign_key_column_name(&relation.target, target_field);
            if table.get_column(&column).is_some() {
                return Err(CompileError::DuplicateColumn {
                    table: table_name,
                    column,
                });
            }
            let ref_table = naming::table_name(&target.name);
            let ref_column = naming::column_name(target_field);
            let fk = reference(&table, &column, &config.schema, &ref_table, &ref_column);

            table = table
                .column(Column::new(&column, target_type))
                .foreign_key(fk)
                .index(Index::new(
                    naming::index_name(&table_name, &[&column]),
                    &config.schema,
                    &table_name,
                    vec![column.clone()],
                ));
        } else {
            let junction = junction_table(config, model, relation, target, target_type)?;
            junction_tables.push(junction);
        }
    }

    debug!(
        model = %model.name,
        table = %table.qualified_name(),
        columns = table.columns.len(),
        junctions = junction_tables.len(),
        "Compiled model"
    );

    Ok(ModelTables {
        table,
        junction_tables,
    })
}

/// Check a model's structural invariants without compiling it.
pub fn validate_model(model: &Model) -> Result<(), CompileError> {
    if model.name.trim().is_empty() {
        return Err(CompileError::EmptyModelName);
    }
    if model.fields.is_empty() {
        return Err(CompileError::NoFields {
            model: model.name.clone(),
        });
    }
    if model.identifiers.is_empty() {
        return Err(CompileError::NoIdentifiers {
            model: model.name.clone(),
        });
    }
    match model.primary_identifier() {
        Some(primary) if !primary.fields.is_empty() => {}
        _ => {
            return Err(CompileError::NoPrimaryIdentifier {
                model: model.name.clone(),
            })
        }
    }

    for (identifier_name, identifier) in sorted_entries(&model.identifiers) {
        if let Some(field) = identifier
            .fields
            .iter()
            .find(|f| !model.fields.contains_key(*f))
        {
            return Err(CompileError::UnknownIdentifierField {
                model: model.name.clone(),
                identifier: identifier_name.clone(),
                field: field.clone(),
            });
        }
    }

    Ok(())
}

/// The single field of a model's primary identifier.
///
/// References and view joins need exactly one key column to point at.
pub(crate) fn single_primary_field(model: &Model) -> Result<(&str, &ModelField), CompileError> {
    let primary = model
        .primary_identifier()
        .ok_or_else(|| CompileError::NoPrimaryIdentifier {
            model: model.name.clone(),
        })?;

    match primary.fields.as_slice() {
        [field_name] => {
            let field =
                model
                    .fields
                    .get(field_name)
                    .ok_or_else(|| CompileError::UnknownIdentifierField {
                        model: model.name.clone(),
                        identifier: PRIMARY_IDENTIFIER.to_string(),
                        field: field_name.clone(),
                    })?;
            Ok((field_name.as_str(), field))
        }
        [] => Err(CompileError::NoPrimaryIdentifier {
            model: model.name.clone(),
        }),
        fields => Err(CompileError::MultiFieldPrimary {
            model: model.name.clone(),
            count: fields.len(),
        }),
    }
}

pub(crate) fn resolve_target<'r>(
    registry: &'r dyn Registry,
    model: &Model,
    relation_name: &str,
    relation: &ModelRelation,
) -> Result<&'r Model, CompileError> {
    registry
        .model(relation.resolved_target())
        .map_err(|_| CompileError::MissingRelationTarget {
            model: model.name.clone(),
            relation: relation_name.to_string(),
            target: relation.resolved_target().to_string(),
        })
}

fn column_type(
    map: &TypeMap,
    model: &str,
    field_name: &str,
    field: &ModelField,
) -> Result<PsqlType, CompileError> {
    map.get(field.field_type)
        .ok_or_else(|| CompileError::UnsupportedFieldType {
            model: model.to_string(),
            field: field_name.to_string(),
            field_type: field.field_type,
            map: map.name(),
        })
}

/// `ON DELETE CASCADE` reference from `table.column` to `ref_table.ref_column`.
fn reference(
    table: &Table,
    column: &str,
    ref_schema: &str,
    ref_table: &str,
    ref_column: &str,
) -> ForeignKey {
    ForeignKey {
        name: naming::foreign_key_name(&table.name, &[column]),
        schema: table.schema.clone(),
        table: table.name.clone(),
        columns: vec![column.to_string()],
        ref_schema: ref_schema.to_string(),
        ref_table: ref_table.to_string(),
        ref_columns: vec![ref_column.to_string()],
        on_delete: Some(ReferentialAction::Cascade),
        on_update: None,
    }
}

fn junction_table(
    config: &ModelsConfig,
    source: &Model,
    relation: &ModelRelation,
    target: &Model,
    target_type: PsqlType,
) -> Result<Table, CompileError> {
    let foreign = TypeMap::foreign(config.use_bigserial);
    let (source_field, source_def) = single_primary_field(source)?;
    let (target_field, _) = single_primary_field(target)?;
    let source_type = column_type(foreign, &source.name, source_field, source_def)?;
    let id_type = if config.use_bigserial {
        PsqlType::BigSerial
    } else {
        PsqlType::Serial
    };

    let name = naming::junction_table_name(&source.name, &relation.target);
    let source_column = naming::foreign_key_column_name(&source.name, source_field);
    let mut target_column = naming::foreign_key_column_name(&relation.target, target_field);
    if target_column == source_column {
        // Self association: both sides would share one column name.
        target_column = naming::abbreviate(
            &format!("related_{}", target_column),
            naming::AbbreviateOptions::HASHED,
        );
    }

    let source_table = naming::table_name(&source.name);
    let target_table = naming::table_name(&target.name);
    let source_ref = naming::column_name(source_field);
    let target_ref = naming::column_name(target_field);

    let mut table = Table::new(&config.schema, &name)
        .column(Column::new("id", id_type).primary_key())
        .column(Column::new(&source_column, source_type).not_null())
        .column(Column::new(&target_column, target_type).not_null());

    let source_fk = reference(&table, &source_column, &config.schema, &source_table, &source_ref);
    let target_fk = reference(&table, &target_column, &config.schema, &target_table, &target_ref);
    let pair = vec![source_column.clone(), target_column.clone()];

    table = table
        .foreign_key(source_fk)
        .foreign_key(target_fk)
        .unique(UniqueConstraint::new(
            naming::unique_constraint_name(&name, &pair),
            pair,
        ))
        .index(Index::new(
            naming::index_name(&name, &[&source_column]),
            &config.schema,
            &name,
            vec![source_column.clone()],
        ))
        .index(Index::new(
            naming::index_name(&name, &[&target_column]),
            &config.schema,
            &name,
            vec![target_column.clone()],
        ));

    Ok(table)
}
