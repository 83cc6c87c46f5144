//! Seed-data IR: `INSERT` statements for enum lookup tables.

use serde::Serialize;

use super::token::{Token, TokenStream};

/// Rows to insert into a table, one `INSERT` per row when rendered.
///
/// Values are already stringified; they are emitted as quoted literals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertStatement {
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InsertStatement {
    /// Create an insert with no rows.
    pub fn new(schema: impl Into<String>, table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn row(mut self, values: Vec<String>) -> Self {
        self.rows.push(values);
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to token stream: one statement per line.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                ts.newline();
            }
            ts.push(Token::Insert)
                .space()
                .push(Token::Into)
                .space()
                .push(Token::QualifiedIdent {
                    schema: Some(self.schema.clone()),
                    name: self.table.clone(),
                })
                .space()
                .ident_list(&self.columns)
                .space()
                .push(Token::Values)
                .space()
                .lparen();

            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    ts.comma().space();
                }
                ts.push(Token::LitString(value.clone()));
            }

            ts.rparen().semicolon();
        }

        ts
    }
}
