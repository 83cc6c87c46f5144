//! Compilation from specification objects to relational IR.
//!
//! ```text
//! Registry ─┬─ enums ──────→ lookup tables + seeds ─┐
//!           ├─ models ─────→ tables + junctions ────┼→ sort by FK → write tables
//!           ├─ structures ─→ morphe_structures ─────┘
//!           └─ entities ───→ views ───────────────────────────────→ write views
//! ```
//!
//! Each compiler is a plain function of its config section, the registry
//! and one specification object. [`Compiler`] runs them all with hooks,
//! orders the tables and hands every artifact to a writer.

pub mod entity;
pub mod enums;
pub mod hooks;
pub mod model;
mod pipeline;
pub mod sort;
pub mod structure;

pub use entity::compile_entity;
pub use enums::{compile_enum, EnumTable};
pub use hooks::{CompileHooks, UnitHooks};
pub use model::{compile_model, validate_model, ModelTables};
pub use pipeline::{Artifact, CompiledSchema, Compiler, Emitted};
pub use sort::{sort_tables, SortError};
pub use structure::{compile_structures, STRUCTURES_TABLE};

use crate::config::SettingsError;
use crate::model::{EnumType, FieldType, RegistryError, RelationKind, SpecKind};
use crate::writer::WriteError;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during compilation.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Configuration error: {0}")]
    Config(#[from] SettingsError),

    #[error("Schema is empty for {kind} compilation")]
    EmptySchema { kind: SpecKind },

    #[error("Structure persistence is enabled but no structure writer is configured")]
    MissingStructureWriter,

    #[error("Model has no name")]
    EmptyModelName,

    #[error("Model {model} has no fields")]
    NoFields { model: String },

    #[error("Model {model} has no identifiers")]
    NoIdentifiers { model: String },

    #[error("Model {model} has no primary identifier")]
    NoPrimaryIdentifier { model: String },

    #[error("Identifier {identifier} of model {model} references unknown field {field}")]
    UnknownIdentifierField {
        model: String,
        identifier: String,
        field: String,
    },

    #[error("Model {model} is referenced but its primary identifier has {count} fields")]
    MultiFieldPrimary { model: String, count: usize },

    #[error("Field {field} of model {model} has type {field_type}, which the {map} type map does not support")]
    UnsupportedFieldType {
        model: String,
        field: String,
        field_type: FieldType,
        map: &'static str,
    },

    #[error("Relation {relation} of model {model} targets unknown model {target}")]
    MissingRelationTarget {
        model: String,
        relation: String,
        target: String,
    },

    #[error("Column {column} appears twice in table {table}")]
    DuplicateColumn { table: String, column: String },

    #[error("Enum has no name")]
    EmptyEnumName,

    #[error("Enum {name} has no entries")]
    NoEnumEntries { name: String },

    #[error("Entry {entry} of enum {name} is not a {expected} literal")]
    EnumValueTypeMismatch {
        name: String,
        entry: String,
        expected: EnumType,
    },

    #[error("Entity has no name")]
    EmptyEntityName,

    #[error("Entity {entity} has no fields")]
    NoEntityFields { entity: String },

    #[error("Field {field} of entity {entity} has invalid path '{path}'")]
    InvalidFieldPath {
        entity: String,
        field: String,
        path: String,
    },

    #[error("Field {field} of entity {entity}: model {model} has no relation {segment}")]
    MissingPathSegment {
        entity: String,
        field: String,
        model: String,
        segment: String,
    },

    #[error("Field {field} of entity {entity}: relation {relation} of model {model} is {kind}, only one-to-one relations can be traversed")]
    NonSingularHop {
        entity: String,
        field: String,
        model: String,
        relation: String,
        kind: RelationKind,
    },

    #[error("Field {field} of entity {entity}: model {model} has no field {segment}")]
    MissingTerminalField {
        entity: String,
        field: String,
        model: String,
        segment: String,
    },

    #[error("Entity {entity} mixes root models {expected} and {found}")]
    EntityRootMismatch {
        entity: String,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Graph(#[from] SortError),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// Raised by user hooks.
    #[error("{0}")]
    Hook(String),

    #[error("Failed to compile {kind} {name}: {source}")]
    Unit {
        kind: SpecKind,
        name: String,
        #[source]
        source: Box<CompileError>,
    },
}

/// Broad class of a [`CompileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Graph,
    Write,
}

impl CompileError {
    /// Attach the unit that failed.
    pub fn in_unit(self, kind: SpecKind, name: impl Into<String>) -> Self {
        CompileError::Unit {
            kind,
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// The error beneath any unit wrappers.
    pub fn root_cause(&self) -> &CompileError {
        match self {
            CompileError::Unit { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root_cause() {
            CompileError::Config(_)
            | CompileError::EmptySchema { .. }
            | CompileError::MissingStructureWriter => ErrorCategory::Configuration,
            CompileError::Graph(_) => ErrorCategory::Graph,
            CompileError::Write(_) => ErrorCategory::Write,
            _ => ErrorCategory::Validation,
        }
    }
}

/// Reject an empty or blank schema name.
pub(crate) fn require_schema(schema: &str, kind: SpecKind) -> Result<(), CompileError> {
    if schema.trim().is_empty() {
        return Err(CompileError::EmptySchema { kind });
    }
    Ok(())
}
