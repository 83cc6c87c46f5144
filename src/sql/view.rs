//! View IR: read-only projections across joined tables.

use serde::Serialize;

use super::token::{Token, TokenStream};

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinType {
    Inner,
    Left,
}

/// Equality between two `alias.column` references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinCondition {
    pub left: String,
    pub right: String,
}

impl JoinCondition {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// `{join_type} JOIN schema.table AS alias ON cond [AND cond ...]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub schema: String,
    pub table: String,
    pub alias: String,
    pub conditions: Vec<JoinCondition>,
}

impl JoinClause {
    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self.join_type {
            JoinType::Inner => ts.push(Token::Inner),
            JoinType::Left => ts.push(Token::Left),
        };
        ts.space()
            .push(Token::Join)
            .space()
            .push(Token::QualifiedIdent {
                schema: Some(self.schema.clone()),
                name: self.table.clone(),
            })
            .space()
            .push(Token::As)
            .space()
            .push(Token::Ident(self.alias.clone()))
            .space()
            .push(Token::On);

        for (i, cond) in self.conditions.iter().enumerate() {
            if i > 0 {
                ts.space().push(Token::And);
            }
            ts.space();
            push_reference(&mut ts, &cond.left);
            ts.space().push(Token::Eq).space();
            push_reference(&mut ts, &cond.right);
        }

        ts
    }
}

/// One output column of a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewColumn {
    /// Output column name.
    pub name: String,
    /// Source reference, `alias.column`.
    pub source: String,
    /// Emitted as `AS alias` when present.
    pub alias: Option<String>,
}

/// `CREATE OR REPLACE VIEW`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ViewColumn>,
    pub from_schema: String,
    pub from_table: String,
    pub from_alias: String,
    pub joins: Vec<JoinClause>,
    /// Optional `WHERE` clause, emitted verbatim.
    pub filter: Option<String>,
}

impl View {
    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Look up a join by its alias.
    pub fn get_join(&self, alias: &str) -> Option<&JoinClause> {
        self.joins.iter().find(|j| j.alias == alias)
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create)
            .space()
            .push(Token::Or)
            .space()
            .push(Token::Replace)
            .space()
            .push(Token::View)
            .space()
            .push(Token::QualifiedIdent {
                schema: Some(self.schema.clone()),
                name: self.name.clone(),
            })
            .space()
            .push(Token::As)
            .space()
            .push(Token::Select);

        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline().indent(1);
            push_reference(&mut ts, &col.source);
            if let Some(ref alias) = col.alias {
                ts.space()
                    .push(Token::As)
                    .space()
                    .push(Token::Ident(alias.clone()));
            }
        }

        ts.newline()
            .push(Token::From)
            .space()
            .push(Token::QualifiedIdent {
                schema: Some(self.from_schema.clone()),
                name: self.from_table.clone(),
            });
        if self.from_alias != self.from_table {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(self.from_alias.clone()));
        }

        for join in &self.joins {
            ts.newline().append(&join.to_tokens());
        }

        if let Some(ref filter) = self.filter {
            ts.newline()
                .push(Token::Where)
                .space()
                .push(Token::Raw(filter.clone()));
        }

        ts.semicolon();
        ts
    }
}

/// `alias.column` rendered with each part quoted as needed.
fn push_reference(ts: &mut TokenStream, reference: &str) {
    match reference.split_once('.') {
        Some((alias, column)) => {
            ts.push(Token::Ident(alias.to_string()))
                .push(Token::Dot)
                .push(Token::Ident(column.to_string()));
        }
        None => {
            ts.push(Token::Ident(reference.to_string()));
        }
    }
}
