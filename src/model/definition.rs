//! Specification objects: models, enums, entities and structures.
//!
//! All name-keyed collections are `HashMap`s. Nothing downstream may rely on
//! their iteration order; compilers walk them through [`sorted_entries`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{EnumType, EnumValue, FieldType, RelationKind};

/// Name of the identifier every model must declare.
pub const PRIMARY_IDENTIFIER: &str = "primary";

/// Attribute tag that makes a field's column `NOT NULL`.
pub const MANDATORY_ATTRIBUTE: &str = "mandatory";

/// Entries of a name-keyed map in lexicographic key order.
pub fn sorted_entries<V>(map: &HashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

// ============================================================================
// Model
// ============================================================================

/// A model maps to one relational table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, ModelField>,
    #[serde(default)]
    pub identifiers: HashMap<String, Identifier>,
    #[serde(default)]
    pub related: HashMap<String, ModelRelation>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), ModelField::new(field_type));
        self
    }

    /// Add a field with attribute tags.
    pub fn field_with(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        attributes: &[&str],
    ) -> Self {
        let mut field = ModelField::new(field_type);
        field.attributes = attributes.iter().map(|a| a.to_string()).collect();
        self.fields.insert(name.into(), field);
        self
    }

    /// Add an identifier.
    pub fn identifier(mut self, name: impl Into<String>, fields: &[&str]) -> Self {
        self.identifiers.insert(
            name.into(),
            Identifier {
                fields: fields.iter().map(|f| f.to_string()).collect(),
            },
        );
        self
    }

    /// Add a relation whose name is also its target model.
    pub fn relation(mut self, target: impl Into<String>, kind: RelationKind) -> Self {
        let target = target.into();
        self.related
            .insert(target.clone(), ModelRelation::new(kind, target));
        self
    }

    /// Add a relation whose declared target resolves to another model.
    pub fn aliased_relation(
        mut self,
        target: impl Into<String>,
        kind: RelationKind,
        alias: impl Into<String>,
    ) -> Self {
        let target = target.into();
        let mut relation = ModelRelation::new(kind, target.clone());
        relation.alias = Some(alias.into());
        self.related.insert(target, relation);
        self
    }

    /// The mandatory `primary` identifier, if declared.
    pub fn primary_identifier(&self) -> Option<&Identifier> {
        self.identifiers.get(PRIMARY_IDENTIFIER)
    }
}

/// A typed model field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelField {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl ModelField {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            attributes: Vec::new(),
        }
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }
}

/// Ordered list of field names identifying a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier {
    pub fields: Vec<String>,
}

/// Typed reference from one model to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRelation {
    #[serde(rename = "type")]
    pub kind: RelationKind,
    /// Declared target; names the foreign-key column and junction table.
    #[serde(default)]
    pub target: String,
    /// Model the relation actually resolves to, when it differs from
    /// `target`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ModelRelation {
    pub fn new(kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            alias: None,
        }
    }

    /// Name of the model to look up in the registry.
    pub fn resolved_target(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.target)
    }
}

// ============================================================================
// Enum
// ============================================================================

/// A closed set of named literals, lowered to a lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: EnumType,
    #[serde(default)]
    pub entries: HashMap<String, EnumValue>,
}

impl Enum {
    pub fn new(name: impl Into<String>, value_type: EnumType) -> Self {
        Self {
            name: name.into(),
            value_type,
            entries: HashMap::new(),
        }
    }

    /// Add an entry.
    pub fn entry(mut self, key: impl Into<String>, value: EnumValue) -> Self {
        self.entries.insert(key.into(), value);
        self
    }
}

// ============================================================================
// Entity
// ============================================================================

/// A read-only projection over one or more models, lowered to a view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, EntityField>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a field sourced from a dot path such as `Person.ContactInfo.Email`.
    pub fn field(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.fields.insert(
            name.into(),
            EntityField {
                path: path.into(),
                attributes: Vec::new(),
            },
        );
        self
    }
}

/// An entity field: a dot path from the entity's root model through
/// zero or more relations to a model field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityField {
    #[serde(rename = "type")]
    pub path: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl EntityField {
    /// Path segments.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('.').collect()
    }
}

// ============================================================================
// Structure
// ============================================================================

/// A schemaless document type persisted in the shared structures table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, ModelField>,
}
