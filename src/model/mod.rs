//! Specification model: the in-memory objects the compiler consumes.

pub mod definition;
pub mod document;
pub mod registry;
pub mod types;

pub use definition::{
    sorted_entries, Entity, EntityField, Enum, Identifier, Model, ModelField, ModelRelation,
    Structure, MANDATORY_ATTRIBUTE, PRIMARY_IDENTIFIER,
};
pub use registry::{InMemoryRegistry, Registry, RegistryError, SpecKind};
pub use types::{Cardinality, EnumType, EnumValue, FieldType, RelationDirection, RelationKind};
