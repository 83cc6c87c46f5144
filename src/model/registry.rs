//! Read-only lookup of specification objects by name.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::definition::{Entity, Enum, Model, Structure};

/// Kind of specification object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind {
    Model,
    Enum,
    Entity,
    Structure,
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpecKind::Model => "model",
            SpecKind::Enum => "enum",
            SpecKind::Entity => "entity",
            SpecKind::Structure => "structure",
        };
        f.write_str(s)
    }
}

/// Errors raised by registry lookups and loading.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: SpecKind, name: String },

    #[error("Spec file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read spec file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse spec file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Name-based access to the loaded specification.
///
/// Name listings are returned in lexicographic order.
pub trait Registry {
    fn model(&self, name: &str) -> Result<&Model, RegistryError>;
    fn enumeration(&self, name: &str) -> Result<&Enum, RegistryError>;
    fn entity(&self, name: &str) -> Result<&Entity, RegistryError>;

    fn model_names(&self) -> Vec<String>;
    fn enum_names(&self) -> Vec<String>;
    fn entity_names(&self) -> Vec<String>;
    fn structure_names(&self) -> Vec<String>;

    fn has_models(&self) -> bool {
        !self.model_names().is_empty()
    }
    fn has_enums(&self) -> bool {
        !self.enum_names().is_empty()
    }
    fn has_entities(&self) -> bool {
        !self.entity_names().is_empty()
    }
    fn has_structures(&self) -> bool {
        !self.structure_names().is_empty()
    }
}

/// Registry backed by in-memory maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    pub(crate) models: HashMap<String, Model>,
    pub(crate) enums: HashMap<String, Enum>,
    pub(crate) entities: HashMap<String, Entity>,
    pub(crate) structures: HashMap<String, Structure>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its name.
    pub fn with_model(mut self, model: Model) -> Self {
        self.insert_model(model);
        self
    }

    /// Register an enum under its name.
    pub fn with_enum(mut self, enumeration: Enum) -> Self {
        self.insert_enum(enumeration);
        self
    }

    /// Register an entity under its name.
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.insert_entity(entity);
        self
    }

    /// Register a structure under its name.
    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.structures.insert(structure.name.clone(), structure);
        self
    }

    pub fn insert_model(&mut self, model: Model) {
        self.models.insert(model.name.clone(), model);
    }

    pub fn insert_enum(&mut self, enumeration: Enum) {
        self.enums.insert(enumeration.name.clone(), enumeration);
    }

    pub fn insert_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.name.clone(), entity);
    }
}

fn sorted_names<V>(map: &HashMap<String, V>) -> Vec<String> {
    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
}

impl Registry for InMemoryRegistry {
    fn model(&self, name: &str) -> Result<&Model, RegistryError> {
        self.models.get(name).ok_or_else(|| RegistryError::NotFound {
            kind: SpecKind::Model,
            name: name.to_string(),
        })
    }

    fn enumeration(&self, name: &str) -> Result<&Enum, RegistryError> {
        self.enums.get(name).ok_or_else(|| RegistryError::NotFound {
            kind: SpecKind::Enum,
            name: name.to_string(),
        })
    }

    fn entity(&self, name: &str) -> Result<&Entity, RegistryError> {
        self.entities.get(name).ok_or_else(|| RegistryError::NotFound {
            kind: SpecKind::Entity,
            name: name.to_string(),
        })
    }

    fn model_names(&self) -> Vec<String> {
        sorted_names(&self.models)
    }

    fn enum_names(&self) -> Vec<String> {
        sorted_names(&self.enums)
    }

    fn entity_names(&self) -> Vec<String> {
        sorted_names(&self.entities)
    }

    fn structure_names(&self) -> Vec<String> {
        sorted_names(&self.structures)
    }
}
