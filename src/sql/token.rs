//! SQL Tokens - the atomic units of DDL output.
//!
//! IR values render themselves into a [`TokenStream`], which serializes to
//! PostgreSQL text. Identifier quoting is decided here and nowhere else.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// SQL Token - every element the DDL writer emits.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    As,
    On,
    Join,
    Inner,
    Left,
    Null,
    Not,

    // === DDL Keywords ===
    Create,
    Schema,
    Table,
    Index,
    View,
    Constraint,
    Primary,
    Key,
    Foreign,
    References,
    Unique,
    Default,
    Cascade,
    Restrict,
    NoAction,
    SetNull,
    SetDefault,
    If,
    Exists,
    Or,
    Replace,
    Using,
    Delete,
    Update,

    // === DML Keywords ===
    Insert,
    Into,
    Values,

    // === Punctuation ===
    Comma,
    Dot,
    Semicolon,
    LParen,
    RParen,

    // === Operators ===
    Eq,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Simple identifier (table, column, alias, constraint)
    Ident(String),
    /// Qualified identifier: schema.table or just table
    QualifiedIdent {
        schema: Option<String>,
        name: String,
    },
    /// String literal
    LitString(String),

    /// Raw SQL passed directly to output without escaping.
    ///
    /// Only used for trusted fragments produced by the compiler itself
    /// (type names, default expressions, filter clauses).
    Raw(String),
}

impl Token {
    /// Serialize this token to PostgreSQL text.
    pub fn serialize(&self) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::As => "AS".into(),
            Token::On => "ON".into(),
            Token::Join => "JOIN".into(),
            Token::Inner => "INNER".into(),
            Token::Left => "LEFT".into(),
            Token::Null => "NULL".into(),
            Token::Not => "NOT".into(),

            // DDL keywords
            Token::Create => "CREATE".into(),
            Token::Schema => "SCHEMA".into(),
            Token::Table => "TABLE".into(),
            Token::Index => "INDEX".into(),
            Token::View => "VIEW".into(),
            Token::Constraint => "CONSTRAINT".into(),
            Token::Primary => "PRIMARY".into(),
            Token::Key => "KEY".into(),
            Token::Foreign => "FOREIGN".into(),
            Token::References => "REFERENCES".into(),
            Token::Unique => "UNIQUE".into(),
            Token::Default => "DEFAULT".into(),
            Token::Cascade => "CASCADE".into(),
            Token::Restrict => "RESTRICT".into(),
            Token::NoAction => "NO ACTION".into(),
            Token::SetNull => "SET NULL".into(),
            Token::SetDefault => "SET DEFAULT".into(),
            Token::If => "IF".into(),
            Token::Exists => "EXISTS".into(),
            Token::Or => "OR".into(),
            Token::Replace => "REPLACE".into(),
            Token::Using => "USING".into(),
            Token::Delete => "DELETE".into(),
            Token::Update => "UPDATE".into(),

            // DML keywords
            Token::Insert => "INSERT".into(),
            Token::Into => "INTO".into(),
            Token::Values => "VALUES".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Semicolon => ";".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),

            // Whitespace
            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Indent(n) => "  ".repeat(*n),

            // Dynamic
            Token::Ident(name) => quote_identifier(name),
            Token::QualifiedIdent { schema, name } => match schema {
                Some(s) => format!("{}.{}", quote_identifier(s), quote_identifier(name)),
                None => quote_identifier(name),
            },
            Token::LitString(s) => quote_string(s),

            // Escape hatch
            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self) -> String {
        self.tokens.iter().map(|t| t.serialize()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn semicolon(&mut self) -> &mut Self {
        self.push(Token::Semicolon)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }

    /// `IF NOT EXISTS`
    pub fn if_not_exists(&mut self) -> &mut Self {
        self.push(Token::If)
            .space()
            .push(Token::Not)
            .space()
            .push(Token::Exists)
    }

    /// `(a, b, c)`
    pub fn ident_list(&mut self, idents: &[String]) -> &mut Self {
        self.lparen();
        for (i, ident) in idents.iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.push(Token::Ident(ident.clone()));
        }
        self.rparen()
    }
}

/// PostgreSQL reserved key words that cannot be used as bare identifiers.
static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both",
        "case", "cast", "check", "collate", "column", "constraint", "create", "current_catalog",
        "current_date", "current_role", "current_time", "current_timestamp", "current_user",
        "default", "deferrable", "desc", "distinct", "do", "else", "end", "except", "false",
        "fetch", "for", "foreign", "from", "grant", "group", "having", "in", "initially",
        "intersect", "into", "lateral", "leading", "limit", "localtime", "localtimestamp", "not",
        "null", "offset", "on", "only", "or", "order", "placing", "primary", "references",
        "returning", "select", "session_user", "some", "symmetric", "table", "then", "to",
        "trailing", "true", "union", "unique", "user", "using", "variadic", "when", "where",
        "window", "with",
    ]
    .into_iter()
    .collect()
});

/// Quote an identifier only when PostgreSQL would not accept it bare.
pub fn quote_identifier(name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && !RESERVED.contains(name);

    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Quote a string literal, doubling embedded single quotes.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
