//! Table-level IR: tables, columns, foreign keys, indices and unique
//! constraints, plus their DDL rendering.
//!
//! # Examples
//!
//! ```ignore
//! use morphe_psql::sql::{Column, PsqlType, Table};
//!
//! let table = Table::new("public", "people")
//!     .column(Column::new("id", PsqlType::Serial).primary_key())
//!     .column(Column::new("name", PsqlType::Text).not_null());
//!
//! println!("{}", table.to_sql());
//! ```

use serde::Serialize;

use super::token::{Token, TokenStream};
use super::types::PsqlType;

// ============================================================================
// Table
// ============================================================================

/// A table definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indices: Vec<Index>,
    pub unique_constraints: Vec<UniqueConstraint>,
}

impl Table {
    /// Create an empty table.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            indices: Vec::new(),
            unique_constraints: Vec::new(),
        }
    }

    /// Add a column definition.
    pub fn column(mut self, col: Column) -> Self {
        self.columns.push(col);
        self
    }

    /// Add a foreign key.
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Add an index.
    pub fn index(mut self, index: Index) -> Self {
        self.indices.push(index);
        self
    }

    /// Add a unique constraint.
    pub fn unique(mut self, constraint: UniqueConstraint) -> Self {
        self.unique_constraints.push(constraint);
        self
    }

    /// Look up a column by name.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the primary-key columns, in column order.
    pub fn primary_key_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.clone())
            .collect()
    }

    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Render `CREATE TABLE` followed by the table's `CREATE INDEX`
    /// statements, one statement per line group.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.create_table_tokens();
        for index in &self.indices {
            ts.newline().append(&index.to_tokens());
        }
        ts
    }

    fn create_table_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create)
            .space()
            .push(Token::Table)
            .space()
            .if_not_exists()
            .space()
            .push(Token::QualifiedIdent {
                schema: Some(self.schema.clone()),
                name: self.name.clone(),
            })
            .space()
            .lparen();

        let pk = self.primary_key_columns();
        let inline_pk = pk.len() == 1;

        let mut clauses: Vec<TokenStream> = self
            .columns
            .iter()
            .map(|c| c.to_tokens(inline_pk))
            .collect();

        if pk.len() > 1 {
            let mut clause = TokenStream::new();
            clause
                .push(Token::Primary)
                .space()
                .push(Token::Key)
                .space()
                .ident_list(&pk);
            clauses.push(clause);
        }

        clauses.extend(self.unique_constraints.iter().map(|u| u.to_tokens()));
        clauses.extend(self.foreign_keys.iter().map(|fk| fk.to_tokens()));

        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline().indent(1).append(clause);
        }

        ts.newline().rparen().semicolon();
        ts
    }
}

// ============================================================================
// Column
// ============================================================================

/// Column definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: PsqlType,
    pub nullable: bool,
    pub primary_key: bool,
    /// Default expression, emitted verbatim.
    pub default: Option<String>,
}

impl Column {
    /// Create a nullable column.
    pub fn new(name: impl Into<String>, data_type: PsqlType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            primary_key: false,
            default: None,
        }
    }

    /// Mark column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark column as part of the primary key (implies NOT NULL).
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Set default expression.
    pub fn default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    /// Convert to token stream. `inline_pk` renders `PRIMARY KEY` on the
    /// column itself instead of as a table constraint.
    pub fn to_tokens(&self, inline_pk: bool) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Ident(self.name.clone()))
            .space()
            .push(Token::Raw(self.data_type.as_sql().to_string()));

        let inline = inline_pk && self.primary_key;

        if !self.nullable && !inline {
            ts.space().push(Token::Not).space().push(Token::Null);
        }

        if let Some(ref expr) = self.default {
            ts.space()
                .push(Token::Default)
                .space()
                .push(Token::Raw(expr.clone()));
        }

        if inline {
            ts.space().push(Token::Primary).space().push(Token::Key);
        }

        ts
    }
}

// ============================================================================
// Constraints
// ============================================================================

/// Referential action for foreign key constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    fn token(&self) -> Token {
        match self {
            ReferentialAction::NoAction => Token::NoAction,
            ReferentialAction::Restrict => Token::Restrict,
            ReferentialAction::Cascade => Token::Cascade,
            ReferentialAction::SetNull => Token::SetNull,
            ReferentialAction::SetDefault => Token::SetDefault,
        }
    }
}

/// Named foreign key constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKey {
    pub name: String,
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
    pub ref_schema: String,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKey {
    /// Whether this key points back at its own table.
    pub fn is_self_reference(&self) -> bool {
        self.schema == self.ref_schema && self.table == self.ref_table
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Constraint)
            .space()
            .push(Token::Ident(self.name.clone()))
            .space()
            .push(Token::Foreign)
            .space()
            .push(Token::Key)
            .space()
            .ident_list(&self.columns)
            .space()
            .push(Token::References)
            .space()
            .push(Token::QualifiedIdent {
                schema: Some(self.ref_schema.clone()),
                name: self.ref_table.clone(),
            })
            .ident_list(&self.ref_columns);

        if let Some(action) = self.on_delete {
            ts.space()
                .push(Token::On)
                .space()
                .push(Token::Delete)
                .space()
                .push(action.token());
        }
        if let Some(action) = self.on_update {
            ts.space()
                .push(Token::On)
                .space()
                .push(Token::Update)
                .space()
                .push(action.token());
        }

        ts
    }
}

/// Named multi-column unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueConstraint {
    pub name: String,
    pub columns: Vec<String>,
}

impl UniqueConstraint {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Constraint)
            .space()
            .push(Token::Ident(self.name.clone()))
            .space()
            .push(Token::Unique)
            .space()
            .ident_list(&self.columns);
        ts
    }
}

// ============================================================================
// CREATE INDEX
// ============================================================================

/// Index access method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexMethod {
    BTree,
    /// Generalized inverted index, for JSONB containment queries.
    Gin,
}

impl IndexMethod {
    pub fn as_sql(&self) -> &'static str {
        match self {
            IndexMethod::BTree => "btree",
            IndexMethod::Gin => "gin",
        }
    }
}

/// Index over one or more columns of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    pub name: String,
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
    /// Access method; `None` leaves the server default (btree).
    pub method: Option<IndexMethod>,
}

impl Index {
    /// Create a plain, non-unique index.
    pub fn new(
        name: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            table: table.into(),
            columns,
            unique: false,
            method: None,
        }
    }

    /// Make this a unique index.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set the access method.
    pub fn using(mut self, method: IndexMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create);
        if self.unique {
            ts.space().push(Token::Unique);
        }
        ts.space()
            .push(Token::Index)
            .space()
            .if_not_exists()
            .space()
            .push(Token::Ident(self.name.clone()))
            .space()
            .push(Token::On)
            .space()
            .push(Token::QualifiedIdent {
                schema: Some(self.schema.clone()),
                name: self.table.clone(),
            });

        if let Some(method) = self.method {
            ts.space()
                .push(Token::Using)
                .space()
                .push(Token::Raw(method.as_sql().to_string()));
        }

        ts.space().ident_list(&self.columns).semicolon();
        ts
    }
}

// ============================================================================
// CREATE SCHEMA
// ============================================================================

/// `CREATE SCHEMA IF NOT EXISTS {schema};`
pub fn create_schema_sql(schema: &str) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Create)
        .space()
        .push(Token::Schema)
        .space()
        .if_not_exists()
        .space()
        .push(Token::Ident(schema.to_string()))
        .semicolon();
    ts.serialize()
}
