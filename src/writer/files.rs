//! Writing a compiled schema to disk.
//!
//! ```text
//! out/
//!   enums/roles.sql
//!   models/people.sql
//!   entities/people_entities.sql
//!   structures/morphe_structures.sql
//!   schema.sql            every artifact in emission order
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::WriteError;
use crate::compile::CompiledSchema;
use crate::model::SpecKind;

/// Name of the combined script.
pub const SCRIPT_FILE: &str = "schema.sql";

/// Write one file per artifact plus the combined script. Returns the
/// written paths in emission order, script last.
pub fn write_to_directory(schema: &CompiledSchema, dir: &Path) -> Result<Vec<PathBuf>, WriteError> {
    let mut written = Vec::with_capacity(schema.len() + 1);

    for emitted in &schema.emission_order {
        let Some(bytes) = schema.bytes(emitted) else {
            continue;
        };
        let subdir = dir.join(kind_dir(emitted.kind));
        fs::create_dir_all(&subdir)?;

        let path = subdir.join(format!("{}.sql", emitted.artifact));
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), "Wrote artifact");
        written.push(path);
    }

    fs::create_dir_all(dir)?;
    let script = dir.join(SCRIPT_FILE);
    fs::write(&script, schema.to_script())?;
    written.push(script);

    Ok(written)
}

fn kind_dir(kind: SpecKind) -> &'static str {
    match kind {
        SpecKind::Model => "models",
        SpecKind::Enum => "enums",
        SpecKind::Entity => "entities",
        SpecKind::Structure => "structures",
    }
}
