//! TOML-based configuration for the schema compiler.
//!
//! Supports a config file (morphe-psql.toml) with environment variable
//! expansion in schema names.
//!
//! Example configuration:
//! ```toml
//! [models]
//! schema = "${APP_SCHEMA}"
//! use_bigserial = true
//!
//! [enums]
//! schema = "public"
//!
//! [entities]
//! schema = "public"
//! view_name_suffix = "_entities"
//!
//! [structures]
//! schema = "public"
//! enable_persistence = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MORPHE_PSQL_CONFIG";

/// Config file searched for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "morphe-psql.toml";

const DEFAULT_SCHEMA: &str = "public";
const DEFAULT_VIEW_SUFFIX: &str = "_entities";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Schema is empty for [{section}]")]
    EmptySchema { section: &'static str },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub models: ModelsConfig,
    pub enums: EnumsConfig,
    pub entities: EntitiesConfig,
    pub structures: StructuresConfig,
}

/// Model compilation settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Target schema.
    pub schema: String,
    /// Use `BIGSERIAL`/`BIGINT` for auto-increment keys and references.
    pub use_bigserial: bool,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            use_bigserial: false,
        }
    }
}

/// Enum compilation settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnumsConfig {
    pub schema: String,
}

impl Default for EnumsConfig {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }
}

/// Entity (view) compilation settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EntitiesConfig {
    pub schema: String,
    /// Appended to the pluralized entity name.
    pub view_name_suffix: String,
    /// Settings of the models the entities project; tables are resolved in
    /// this schema.
    #[serde(skip)]
    pub models: ModelsConfig,
}

impl Default for EntitiesConfig {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            view_name_suffix: DEFAULT_VIEW_SUFFIX.to_string(),
            models: ModelsConfig::default(),
        }
    }
}

/// Structure persistence settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StructuresConfig {
    pub schema: String,
    /// Emit the shared `morphe_structures` table.
    pub enable_persistence: bool,
    pub use_bigserial: bool,
}

impl Default for StructuresConfig {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            enable_persistence: false,
            use_bigserial: false,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(source)?;
        settings.entities.models = settings.models.clone();
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `MORPHE_PSQL_CONFIG`
    /// 2. `./morphe-psql.toml`
    /// 3. `~/.config/morphe-psql/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("morphe-psql").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Expand environment variables in every schema name.
    pub fn resolve(mut self) -> Result<Self, SettingsError> {
        self.models.schema = expand_env_vars(&self.models.schema)?;
        self.enums.schema = expand_env_vars(&self.enums.schema)?;
        self.entities.schema = expand_env_vars(&self.entities.schema)?;
        self.structures.schema = expand_env_vars(&self.structures.schema)?;
        self.entities.models = self.models.clone();
        Ok(self)
    }

    /// Check that every section names a schema.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let sections = [
            ("models", &self.models.schema),
            ("enums", &self.enums.schema),
            ("entities", &self.entities.schema),
            ("structures", &self.structures.schema),
        ];
        for (section, schema) in sections {
            if schema.trim().is_empty() {
                return Err(SettingsError::EmptySchema { section });
            }
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name = if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut name = String::new();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                name.push(ch);
            }
            name
        } else {
            // $VAR (ends at non-alphanumeric/underscore)
            let mut name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
