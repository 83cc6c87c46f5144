//! Entity compilation: a view over the entity's root model table, joined
//! along the one-to-one relations its field paths traverse.
//!
//! A field path is `Root.Hop.Hop.Field`. The root is the model every path
//! of the entity starts from; each hop names a relation on the model
//! reached so far; the last segment names a field of the final model.
//!
//! ```text
//! Person.ContactInfo.Email
//!   FROM people
//!   LEFT JOIN contact_infos AS contact_infos ON people.id = contact_infos.id
//!   SELECT contact_infos.email
//! ```
//!
//! Joins are keyed by their alias (the joined table's name), so fields
//! sharing a hop share one join. A hop back to the root table is aliased
//! `{table}_{relation}` instead, since the root table already holds the
//! table name. Joins keep first-encounter order over the sorted field
//! names.

use tracing::debug;

use super::model::{resolve_target, single_primary_field};
use super::{require_schema, CompileError};
use crate::config::EntitiesConfig;
use crate::model::{sorted_entries, Entity, Model, Registry, SpecKind};
use crate::naming;
use crate::sql::{JoinClause, JoinCondition, JoinType, View, ViewColumn};

/// Compile an entity into a view.
pub fn compile_entity(
    config: &EntitiesConfig,
    registry: &dyn Registry,
    entity: &Entity,
) -> Result<View, CompileError> {
    if entity.name.trim().is_empty() {
        return Err(CompileError::EmptyEntityName);
    }
    if entity.fields.is_empty() {
        return Err(CompileError::NoEntityFields {
            entity: entity.name.clone(),
        });
    }
    require_schema(&config.schema, SpecKind::Entity)?;
    require_schema(&config.models.schema, SpecKind::Model)?;

    let mut paths = Vec::with_capacity(entity.fields.len());
    for (field_name, field) in sorted_entries(&entity.fields) {
        paths.push(FieldPath::parse(entity, field_name, &field.path)?);
    }

    let root_name = paths.first().map(|p| p.root).unwrap_or_default();
    let root = registry.model(root_name)?;
    let root_table = naming::table_name(&root.name);
    let table_schema = config.models.schema.as_str();

    let mut columns = Vec::with_capacity(paths.len());
    let mut joins: Vec<JoinClause> = Vec::new();

    for FieldPath {
        field: field_name,
        root: head,
        hops,
        terminal,
    } in paths
    {
        if head != root_name {
            return Err(CompileError::EntityRootMismatch {
                entity: entity.name.clone(),
                expected: root_name.to_string(),
                found: head.to_string(),
            });
        }

        let mut current: &Model = root;
        let mut current_alias = root_table.clone();

        for hop in hops {
            let relation =
                current
                    .related
                    .get(hop)
                    .ok_or_else(|| CompileError::MissingPathSegment {
                        entity: entity.name.clone(),
                        field: field_name.clone(),
                        model: current.name.clone(),
                        segment: hop.to_string(),
                    })?;
            if !relation.kind.is_one() {
                return Err(CompileError::NonSingularHop {
                    entity: entity.name.clone(),
                    field: field_name.clone(),
                    model: current.name.clone(),
                    relation: hop.to_string(),
                    kind: relation.kind,
                });
            }

            let target = resolve_target(registry, current, hop, relation)?;
            let target_table = naming::table_name(&target.name);
            let target_alias = if target_table == root_table {
                let raw = format!("{}_{}", target_table, naming::snake_case(hop));
                naming::abbreviate(&raw, naming::AbbreviateOptions::HASHED)
            } else {
                target_table.clone()
            };

            if !joins.iter().any(|j| j.alias == target_alias) {
                let (source_key, _) = single_primary_field(current)?;
                let (target_key, _) = single_primary_field(target)?;
                joins.push(JoinClause {
                    join_type: JoinType::Left,
                    schema: table_schema.to_string(),
                    table: target_table,
                    alias: target_alias.clone(),
                    conditions: vec![JoinCondition::new(
                        format!("{}.{}", current_alias, naming::column_name(source_key)),
                        format!("{}.{}", target_alias, naming::column_name(target_key)),
                    )],
                });
            }

            current = target;
            current_alias = target_alias;
        }

        if !current.fields.contains_key(terminal) {
            return Err(CompileError::MissingTerminalField {
                entity: entity.name.clone(),
                field: field_name.clone(),
                model: current.name.clone(),
                segment: terminal.to_string(),
            });
        }

        let source_column = naming::column_name(terminal);
        let output = naming::column_name(field_name);
        let alias = (output != source_column).then(|| output.clone());
        columns.push(ViewColumn {
            name: output,
            source: format!("{}.{}", current_alias, source_column),
            alias,
        });
    }

    let view = View {
        schema: config.schema.clone(),
        name: naming::view_name(&entity.name, &config.view_name_suffix),
        columns,
        from_schema: table_schema.to_string(),
        from_table: root_table.clone(),
        from_alias: root_table,
        joins,
        filter: None,
    };

    debug!(
        entity = %entity.name,
        view = %view.qualified_name(),
        columns = view.columns.len(),
        joins = view.joins.len(),
        "Compiled entity"
    );

    Ok(view)
}

/// A field path split into its segments.
struct FieldPath<'a> {
    field: &'a String,
    root: &'a str,
    hops: Vec<&'a str>,
    terminal: &'a str,
}

impl<'a> FieldPath<'a> {
    fn parse(entity: &Entity, field: &'a String, path: &'a str) -> Result<Self, CompileError> {
        let invalid = || CompileError::InvalidFieldPath {
            entity: entity.name.clone(),
            field: field.clone(),
            path: path.to_string(),
        };

        let mut segments: Vec<&str> = path.split('.').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            return Err(invalid());
        }
        let terminal = segments.pop().ok_or_else(invalid)?;
        let root = segments.remove(0);

        Ok(Self {
            field,
            root,
            hops: segments,
            terminal,
        })
    }
}
