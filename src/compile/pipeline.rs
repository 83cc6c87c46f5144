//! The compiler: runs every unit with its hooks, orders tables by their
//! foreign keys and writes each artifact.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::enums::{self, EnumTable};
use super::hooks::CompileHooks;
use super::model::{self, ModelTables};
use super::{entity, sort, structure, CompileError, STRUCTURES_TABLE};
use crate::config::Settings;
use crate::model::{Registry, SpecKind};
use crate::sql::{InsertStatement, Table, View};
use crate::writer::{SchemaWriter, Writers};

/// A compiled object together with the bytes its writer produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact<T> {
    pub ir: T,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl<T> Artifact<T> {
    /// Written bytes as text, if they are UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Reference to one written artifact, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Emitted {
    pub kind: SpecKind,
    /// Name of the specification object that produced the artifact.
    pub source: String,
    /// Table or view name.
    pub artifact: String,
}

/// Everything one compilation produced.
///
/// Artifacts are grouped by kind, then by source object name, then by
/// artifact name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompiledSchema {
    pub models: BTreeMap<String, BTreeMap<String, Artifact<Table>>>,
    pub enums: BTreeMap<String, BTreeMap<String, Artifact<EnumTable>>>,
    pub entities: BTreeMap<String, BTreeMap<String, Artifact<View>>>,
    pub structures: BTreeMap<String, BTreeMap<String, Artifact<Table>>>,
    /// Tables in dependency order, then views in entity-name order.
    pub emission_order: Vec<Emitted>,
}

impl CompiledSchema {
    /// Bytes written for an emitted artifact.
    pub fn bytes(&self, emitted: &Emitted) -> Option<&[u8]> {
        fn find<'a, T>(
            map: &'a BTreeMap<String, BTreeMap<String, Artifact<T>>>,
            emitted: &Emitted,
        ) -> Option<&'a [u8]> {
            map.get(&emitted.source)
                .and_then(|artifacts| artifacts.get(&emitted.artifact))
                .map(|a| a.bytes.as_slice())
        }

        match emitted.kind {
            SpecKind::Model => find(&self.models, emitted),
            SpecKind::Enum => find(&self.enums, emitted),
            SpecKind::Entity => find(&self.entities, emitted),
            SpecKind::Structure => find(&self.structures, emitted),
        }
    }

    /// Every artifact concatenated in emission order, one blank line apart.
    pub fn to_script(&self) -> String {
        self.emission_order
            .iter()
            .filter_map(|emitted| self.bytes(emitted))
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of written artifacts.
    pub fn len(&self) -> usize {
        self.emission_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emission_order.is_empty()
    }

    fn record(&mut self, emitted: Emitted, artifact: Written) {
        let Emitted {
            source, artifact: name, ..
        } = emitted.clone();
        match artifact {
            Written::Model(a) => {
                self.models.entry(source).or_default().insert(name, a);
            }
            Written::Enum(a) => {
                self.enums.entry(source).or_default().insert(name, a);
            }
            Written::Entity(a) => {
                self.entities.entry(source).or_default().insert(name, a);
            }
            Written::Structure(a) => {
                self.structures.entry(source).or_default().insert(name, a);
            }
        }
        self.emission_order.push(emitted);
    }
}

enum Written {
    Model(Artifact<Table>),
    Enum(Artifact<EnumTable>),
    Entity(Artifact<View>),
    Structure(Artifact<Table>),
}

/// Where a compiled table came from.
struct Origin {
    kind: SpecKind,
    source: String,
    seed: Option<InsertStatement>,
}

/// Runs all compilation units against one set of settings.
///
/// # Example
///
/// ```ignore
/// use morphe_psql::prelude::*;
///
/// let registry = InMemoryRegistry::from_file("schema.toml")?;
/// let compiler = Compiler::new(Settings::load()?.resolve()?);
/// let schema = compiler.compile_all(&registry, &mut Writers::psql())?;
/// println!("{}", schema.to_script());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    settings: Settings,
    hooks: CompileHooks,
}

impl Compiler {
    pub fn new(mut settings: Settings) -> Self {
        settings.entities.models = settings.models.clone();
        Self {
            settings,
            hooks: CompileHooks::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: CompileHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Compile one model by name.
    pub fn compile_model(
        &self,
        registry: &dyn Registry,
        name: &str,
    ) -> Result<ModelTables, CompileError> {
        let model = registry.model(name)?;
        self.hooks
            .model
            .run(&self.settings.models, model, |config, model| {
                model::compile_model(config, registry, model)
            })
    }

    /// Compile one enum by name.
    pub fn compile_enum(&self, registry: &dyn Registry, name: &str) -> Result<EnumTable, CompileError> {
        let enumeration = registry.enumeration(name)?;
        self.hooks
            .enumeration
            .run(&self.settings.enums, enumeration, enums::compile_enum)
    }

    /// Compile one entity by name.
    pub fn compile_entity(&self, registry: &dyn Registry, name: &str) -> Result<View, CompileError> {
        let entity = registry.entity(name)?;
        self.hooks
            .entity
            .run(&self.settings.entities, entity, |config, entity| {
                entity::compile_entity(config, registry, entity)
            })
    }

    /// Compile the shared structure table.
    pub fn compile_structures(&self, registry: &dyn Registry) -> Result<Option<Table>, CompileError> {
        let count = registry.structure_names().len();
        self.hooks
            .structure
            .run(&self.settings.structures, &(), |config, _| {
                structure::compile_structures(config, count)
            })
    }

    /// Compile every object in the registry and write the results.
    ///
    /// Stops at the first failing unit. Tables are written in foreign-key
    /// dependency order, views afterwards in entity-name order.
    pub fn compile_all(
        &self,
        registry: &dyn Registry,
        writers: &mut Writers,
    ) -> Result<CompiledSchema, CompileError> {
        self.settings.validate()?;
        if self.settings.structures.enable_persistence && writers.structures.is_none() {
            return Err(CompileError::MissingStructureWriter);
        }
        if !(registry.has_models()
            || registry.has_enums()
            || registry.has_entities()
            || registry.has_structures())
        {
            warn!("Registry is empty, nothing to compile");
        }

        let mut tables = Vec::new();
        let mut origins: HashMap<String, Origin> = HashMap::new();

        for name in registry.enum_names() {
            let EnumTable { table, seed } = self
                .compile_enum(registry, &name)
                .map_err(|e| e.in_unit(SpecKind::Enum, &name))?;
            origins.insert(
                table.qualified_name(),
                Origin {
                    kind: SpecKind::Enum,
                    source: name,
                    seed: Some(seed),
                },
            );
            tables.push(table);
        }

        for name in registry.model_names() {
            let compiled = self
                .compile_model(registry, &name)
                .map_err(|e| e.in_unit(SpecKind::Model, &name))?;
            for table in compiled.into_tables() {
                origins.insert(
                    table.qualified_name(),
                    Origin {
                        kind: SpecKind::Model,
                        source: name.clone(),
                        seed: None,
                    },
                );
                tables.push(table);
            }
        }

        if let Some(table) = self
            .compile_structures(registry)
            .map_err(|e| e.in_unit(SpecKind::Structure, STRUCTURES_TABLE))?
        {
            origins.insert(
                table.qualified_name(),
                Origin {
                    kind: SpecKind::Structure,
                    source: STRUCTURES_TABLE.to_string(),
                    seed: None,
                },
            );
            tables.push(table);
        }

        let mut views = Vec::new();
        for name in registry.entity_names() {
            let view = self
                .compile_entity(registry, &name)
                .map_err(|e| e.in_unit(SpecKind::Entity, &name))?;
            views.push((name, view));
        }

        let table_count = tables.len();
        let ordered = sort::sort_tables(tables)?;
        debug!(
            order = ?ordered.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            "Sorted tables"
        );

        let mut schema = CompiledSchema::default();

        for table in ordered {
            let Some(origin) = origins.remove(&table.qualified_name()) else {
                continue;
            };
            let Origin { kind, source, seed } = origin;
            let writer = writer_for(writers, kind)?;
            let bytes = self
                .write_table(writer, &table, seed.as_ref())
                .map_err(|e| e.in_unit(kind, &source))?;

            let emitted = Emitted {
                kind,
                source,
                artifact: table.name.clone(),
            };
            let written = match (kind, seed) {
                (SpecKind::Enum, Some(seed)) => Written::Enum(Artifact {
                    ir: EnumTable { table, seed },
                    bytes,
                }),
                (SpecKind::Structure, _) => Written::Structure(Artifact { ir: table, bytes }),
                _ => Written::Model(Artifact { ir: table, bytes }),
            };
            schema.record(emitted, written);
        }

        for (name, view) in views {
            let bytes = self
                .write_view(writers.entities.as_mut(), &view)
                .map_err(|e| e.in_unit(SpecKind::Entity, &name))?;
            let emitted = Emitted {
                kind: SpecKind::Entity,
                source: name,
                artifact: view.name.clone(),
            };
            schema.record(emitted, Written::Entity(Artifact { ir: view, bytes }));
        }

        info!(
            tables = table_count,
            views = schema.entities.len(),
            artifacts = schema.len(),
            "Compiled schema"
        );

        Ok(schema)
    }

    fn write_table(
        &self,
        writer: &mut dyn SchemaWriter,
        table: &Table,
        seed: Option<&InsertStatement>,
    ) -> Result<Vec<u8>, CompileError> {
        self.hooks.write_table.run(&(), table, |_, table| {
            let mut bytes = writer.write_table(table)?;
            if let Some(seed) = seed {
                bytes.extend(writer.write_seed(seed)?);
            }
            Ok(bytes)
        })
    }

    fn write_view(&self, writer: &mut dyn SchemaWriter, view: &View) -> Result<Vec<u8>, CompileError> {
        self.hooks
            .write_view
            .run(&(), view, |_, view| Ok(writer.write_view(view)?))
    }
}

fn writer_for(writers: &mut Writers, kind: SpecKind) -> Result<&mut dyn SchemaWriter, CompileError> {
    match kind {
        SpecKind::Model => Ok(writers.models.as_mut()),
        SpecKind::Enum => Ok(writers.enums.as_mut()),
        SpecKind::Entity => Ok(writers.entities.as_mut()),
        SpecKind::Structure => match writers.structures.as_deref_mut() {
            Some(writer) => Ok(writer),
            None => Err(CompileError::MissingStructureWriter),
        },
    }
}
