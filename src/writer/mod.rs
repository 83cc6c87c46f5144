//! Schema writers: turn compiled IR into bytes.
//!
//! The compiler hands each table, view and seed to a [`SchemaWriter`] and
//! keeps whatever bytes come back. [`PsqlWriter`] renders PostgreSQL DDL;
//! other targets plug in by implementing the trait.

mod files;

pub use files::{write_to_directory, SCRIPT_FILE};

use crate::sql::{create_schema_sql, InsertStatement, Table, View};

/// Errors raised while writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {artifact}: {message}")]
    Format { artifact: String, message: String },
}

/// Serializes compiled artifacts.
pub trait SchemaWriter {
    fn write_table(&mut self, table: &Table) -> Result<Vec<u8>, WriteError>;
    fn write_view(&mut self, view: &View) -> Result<Vec<u8>, WriteError>;
    /// Seed rows for a table written just before.
    fn write_seed(&mut self, seed: &InsertStatement) -> Result<Vec<u8>, WriteError>;
}

/// Writes PostgreSQL DDL, each table and view preceded by
/// `CREATE SCHEMA IF NOT EXISTS` for its schema.
#[derive(Debug, Clone)]
pub struct PsqlWriter {
    create_schema: bool,
}

impl PsqlWriter {
    pub fn new() -> Self {
        Self {
            create_schema: true,
        }
    }

    /// Omit the `CREATE SCHEMA` preamble.
    pub fn without_schema(mut self) -> Self {
        self.create_schema = false;
        self
    }

    fn render(&self, schema: &str, body: String) -> Vec<u8> {
        let mut out = String::new();
        if self.create_schema {
            out.push_str(&create_schema_sql(schema));
            out.push_str("\n\n");
        }
        out.push_str(&body);
        out.push('\n');
        out.into_bytes()
    }
}

impl Default for PsqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaWriter for PsqlWriter {
    fn write_table(&mut self, table: &Table) -> Result<Vec<u8>, WriteError> {
        Ok(self.render(&table.schema, table.to_sql()))
    }

    fn write_view(&mut self, view: &View) -> Result<Vec<u8>, WriteError> {
        Ok(self.render(&view.schema, view.to_sql()))
    }

    fn write_seed(&mut self, seed: &InsertStatement) -> Result<Vec<u8>, WriteError> {
        if seed.rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut sql = seed.to_sql();
        sql.push('\n');
        Ok(sql.into_bytes())
    }
}

/// One writer per artifact kind.
///
/// The structure writer is only required when structure persistence is
/// enabled.
pub struct Writers {
    pub models: Box<dyn SchemaWriter>,
    pub enums: Box<dyn SchemaWriter>,
    pub entities: Box<dyn SchemaWriter>,
    pub structures: Option<Box<dyn SchemaWriter>>,
}

impl Writers {
    /// PostgreSQL writers for every kind.
    pub fn psql() -> Self {
        Self {
            models: Box::new(PsqlWriter::new()),
            enums: Box::new(PsqlWriter::new()),
            entities: Box::new(PsqlWriter::new()),
            structures: Some(Box::new(PsqlWriter::new())),
        }
    }

    /// Drop the structure writer.
    pub fn without_structures(mut self) -> Self {
        self.structures = None;
        self
    }
}

impl std::fmt::Debug for Writers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writers")
            .field("structures", &self.structures.is_some())
            .finish_non_exhaustive()
    }
}
