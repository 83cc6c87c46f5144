//! # Morphe PSQL
//!
//! Compiles Morphe specifications (models, enums, entities, structures)
//! into PostgreSQL schema definitions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Specification (TOML document)               │
//! │        (models, enums, entities, structures)             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [registry]
//! ┌─────────────────────────────────────────────────────────┐
//! │               Model (Rust Types, by name)                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compilers + naming + type maps]
//! ┌─────────────────────────────────────────────────────────┐
//! │         Relational IR (tables, views, seed rows)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [dependency sort]
//! ┌─────────────────────────────────────────────────────────┐
//! │             Ordered IR → writer → DDL bytes              │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compile;
pub mod config;
pub mod model;
pub mod naming;
pub mod sql;
pub mod writer;

// Re-export SQL submodules at crate level
pub use sql::ddl;
pub use sql::dml;
pub use sql::token;
pub use sql::view;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{
        CompileError, CompileHooks, CompiledSchema, Compiler, Emitted, UnitHooks,
    };
    pub use crate::config::Settings;
    pub use crate::model::{
        Entity, Enum, EnumType, EnumValue, FieldType, InMemoryRegistry, Model, Registry,
        RelationKind, SpecKind, Structure,
    };
    pub use crate::sql::{Column, ForeignKey, Index, InsertStatement, PsqlType, Table, View};
    pub use crate::writer::{PsqlWriter, SchemaWriter, WriteError, Writers};
}

pub use compile::{CompileError, Compiler};
pub use config::Settings;
pub use model::{InMemoryRegistry, Registry};
