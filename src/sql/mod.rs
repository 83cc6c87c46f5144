//! Relational IR and its PostgreSQL rendering.
//!
//! - [`ddl`] - tables, columns, foreign keys, indices, unique constraints
//! - [`view`] - views and join clauses
//! - [`dml`] - seed-data inserts
//! - [`types`] - column types and the field-type lookup tables
//! - [`token`] - token types for SQL generation

pub mod ddl;
pub mod dml;
pub mod token;
pub mod types;
pub mod view;

#[cfg(test)]
pub mod test_utils;

pub use ddl::{
    create_schema_sql, Column, ForeignKey, Index, IndexMethod, ReferentialAction, Table,
    UniqueConstraint,
};
pub use dml::InsertStatement;
pub use token::{Token, TokenStream};
pub use types::{PsqlType, TypeMap};
pub use view::{JoinClause, JoinCondition, JoinType, View, ViewColumn};
