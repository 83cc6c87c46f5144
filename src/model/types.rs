//! Scalar types of the specification language.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Field types a model field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    AutoIncrement,
    Boolean,
    Date,
    Float,
    Integer,
    /// Reversibly encrypted at rest.
    Protected,
    /// One-way hashed at rest.
    Sealed,
    String,
    Time,
    #[serde(rename = "UUID")]
    Uuid,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::AutoIncrement => "AutoIncrement",
            FieldType::Boolean => "Boolean",
            FieldType::Date => "Date",
            FieldType::Float => "Float",
            FieldType::Integer => "Integer",
            FieldType::Protected => "Protected",
            FieldType::Sealed => "Sealed",
            FieldType::String => "String",
            FieldType::Time => "Time",
            FieldType::Uuid => "UUID",
        };
        f.write_str(s)
    }
}

/// Which side of a relation owns the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationDirection {
    /// This model references the target.
    For,
    /// Inverse side; resolved from the other model.
    Has,
}

/// How many targets a relation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    One,
    Many,
}

/// Relation kind: direction x cardinality.
///
/// Only `For` relations produce schema artifacts on the owning model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationKind {
    pub direction: RelationDirection,
    pub cardinality: Cardinality,
}

impl RelationKind {
    pub const FOR_ONE: Self = Self::new(RelationDirection::For, Cardinality::One);
    pub const FOR_MANY: Self = Self::new(RelationDirection::For, Cardinality::Many);
    pub const HAS_ONE: Self = Self::new(RelationDirection::Has, Cardinality::One);
    pub const HAS_MANY: Self = Self::new(RelationDirection::Has, Cardinality::Many);

    pub const fn new(direction: RelationDirection, cardinality: Cardinality) -> Self {
        Self {
            direction,
            cardinality,
        }
    }

    pub fn is_for(&self) -> bool {
        self.direction == RelationDirection::For
    }

    pub fn is_one(&self) -> bool {
        self.cardinality == Cardinality::One
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            RelationDirection::For => "For",
            RelationDirection::Has => "Has",
        };
        let cardinality = match self.cardinality {
            Cardinality::One => "One",
            Cardinality::Many => "Many",
        };
        write!(f, "{}{}", direction, cardinality)
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ForOne" => Ok(Self::FOR_ONE),
            "ForMany" => Ok(Self::FOR_MANY),
            "HasOne" => Ok(Self::HAS_ONE),
            "HasMany" => Ok(Self::HAS_MANY),
            other => Err(format!("unknown relation type: {}", other)),
        }
    }
}

impl TryFrom<String> for RelationKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RelationKind> for String {
    fn from(kind: RelationKind) -> Self {
        kind.to_string()
    }
}

/// Declared literal type of an enum's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnumType {
    String,
    Integer,
    Float,
}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnumType::String => "String",
            EnumType::Integer => "Integer",
            EnumType::Float => "Float",
        };
        f.write_str(s)
    }
}

/// Literal value of an enum entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Integer(i64),
    Float(f64),
    String(String),
}

impl EnumValue {
    /// Whether the literal is representable as `ty`. Integers are accepted
    /// where floats are declared.
    pub fn matches(&self, ty: EnumType) -> bool {
        matches!(
            (self, ty),
            (EnumValue::String(_), EnumType::String)
                | (EnumValue::Integer(_), EnumType::Integer)
                | (EnumValue::Float(_), EnumType::Float)
                | (EnumValue::Integer(_), EnumType::Float)
        )
    }

    /// Textual form stored in the lookup table.
    pub fn to_literal(&self) -> String {
        match self {
            EnumValue::String(s) => s.clone(),
            EnumValue::Integer(n) => n.to_string(),
            EnumValue::Float(x) => {
                let mut buffer = ryu::Buffer::new();
                buffer.format(*x).to_string()
            }
        }
    }
}
