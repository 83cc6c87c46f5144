//! TOML specification documents.
//!
//! A document holds every specification object in one file:
//!
//! ```toml
//! [models.Person]
//! fields = { ID = { type = "AutoIncrement" }, Name = { type = "String", attributes = ["mandatory"] } }
//! identifiers = { primary = ["ID"] }
//!
//! [models.Person.related]
//! ContactInfo = { type = "ForOne" }
//!
//! [enums.Role]
//! type = "String"
//! entries = { Admin = "ADMIN", Viewer = "VIEWER" }
//!
//! [entities.Person]
//! fields = { Email = { type = "Person.ContactInfo.Email" } }
//! ```
//!
//! Object names come from their table keys, and a relation without an
//! explicit `target` targets the model its key names.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::definition::{Entity, Enum, Model, Structure};
use super::registry::{InMemoryRegistry, RegistryError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpecDocument {
    models: HashMap<String, Model>,
    enums: HashMap<String, Enum>,
    entities: HashMap<String, Entity>,
    structures: HashMap<String, Structure>,
}

impl InMemoryRegistry {
    /// Load a registry from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryError> {
        let document: SpecDocument = toml::from_str(source)?;
        let mut registry = InMemoryRegistry::new();

        for (name, mut model) in document.models {
            model.name = name.clone();
            for (relation_name, relation) in model.related.iter_mut() {
                if relation.target.is_empty() {
                    relation.target = relation_name.clone();
                }
            }
            registry.models.insert(name, model);
        }

        for (name, mut enumeration) in document.enums {
            enumeration.name = name.clone();
            registry.enums.insert(name, enumeration);
        }

        for (name, mut entity) in document.entities {
            entity.name = name.clone();
            registry.entities.insert(name, entity);
        }

        for (name, mut structure) in document.structures {
            structure.name = name.clone();
            registry.structures.insert(name, structure);
        }

        Ok(registry)
    }

    /// Load a registry from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RegistryError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
