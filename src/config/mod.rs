//! Configuration module.
//!
//! Handles per-unit compilation settings loaded from TOML.

mod settings;

pub use settings::{
    expand_env_vars, EntitiesConfig, EnumsConfig, ModelsConfig, Settings, SettingsError,
    StructuresConfig, CONFIG_ENV_VAR, LOCAL_CONFIG_FILE,
};
