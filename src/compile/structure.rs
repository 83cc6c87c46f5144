//! Structure persistence: one shared table holding every structure value
//! as a typed JSON document.

use tracing::{debug, warn};

use super::{require_schema, CompileError};
use crate::config::StructuresConfig;
use crate::naming;
use crate::sql::{Column, Index, IndexMethod, PsqlType, Table};

/// Name of the shared structure table.
pub const STRUCTURES_TABLE: &str = "morphe_structures";

/// Build the shared structure table, or `None` when persistence is off.
///
/// `structure_count` only feeds diagnostics: the table is emitted whenever
/// persistence is enabled, even if no structures are registered yet.
pub fn compile_structures(
    config: &StructuresConfig,
    structure_count: usize,
) -> Result<Option<Table>, CompileError> {
    if !config.enable_persistence {
        debug!("Structure persistence disabled");
        return Ok(None);
    }
    require_schema(&config.schema, crate::model::SpecKind::Structure)?;

    if structure_count == 0 {
        warn!(
            schema = %config.schema,
            "Structure persistence is enabled but no structures are defined"
        );
    }

    let id_type = if config.use_bigserial {
        PsqlType::BigSerial
    } else {
        PsqlType::Serial
    };
    let type_index = naming::index_name(STRUCTURES_TABLE, &["type"]);
    let data_index = naming::index_name(STRUCTURES_TABLE, &["data"]);

    let table = Table::new(&config.schema, STRUCTURES_TABLE)
        .column(Column::new("id", id_type).primary_key())
        .column(Column::new("type", PsqlType::Text).not_null())
        .column(Column::new("data", PsqlType::Jsonb).not_null())
        .column(
            Column::new("created_at", PsqlType::TimestampTz)
                .not_null()
                .default("now()"),
        )
        .column(
            Column::new("updated_at", PsqlType::TimestampTz)
                .not_null()
                .default("now()"),
        )
        .index(Index::new(
            type_index,
            &config.schema,
            STRUCTURES_TABLE,
            vec!["type".to_string()],
        ))
        .index(
            Index::new(
                data_index,
                &config.schema,
                STRUCTURES_TABLE,
                vec!["data".to_string()],
            )
            .using(IndexMethod::Gin),
        );

    debug!(
        table = %table.qualified_name(),
        structures = structure_count,
        "Compiled structure table"
    );

    Ok(Some(table))
}
