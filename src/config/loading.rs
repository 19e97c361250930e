use std::{fs, path::Path};

use schemars::{Schema, schema_for};
use toml::Value;
use tracing::debug;

use super::{Config, ConfigPaths};
use crate::{PawError, Result};

impl Config {
    /// Load the main configuration file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be located, or as
    /// [`load_from`](Self::load_from)
    pub fn load() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        Self::load_from(&path)
    }

    /// Load a configuration file, falling back to defaults if it is missing
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds values that fail validation
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| PawError::io_at(e, path))?;
        Self::parse(&content, Some(path))
    }

    /// Parse and validate TOML configuration text
    ///
    /// # Errors
    /// Returns `TomlParse` with `path` as location on syntax or type errors,
    /// `Config` on out-of-range values
    pub fn parse(content: &str, path: Option<&Path>) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| PawError::toml_parse(e, path))?;
        config.audio.validate()?;
        Ok(config)
    }

    /// Look up a value by dotted path such as `audio.max_volume`
    ///
    /// # Errors
    /// Returns `Config` if no value lives at `path`
    pub fn get_by_path(&self, path: &str) -> Result<Value> {
        let root = Value::try_from(self).map_err(|e| PawError::Config {
            field: path.to_string(),
            reason: format!("cannot serialize config: {e}"),
        })?;

        path.split('.')
            .try_fold(&root, |value, key| value.get(key))
            .cloned()
            .ok_or_else(|| PawError::Config {
                field: path.to_string(),
                reason: "no such setting".to_string(),
            })
    }

    /// JSON schema of the configuration file
    pub fn schema() -> Schema {
        schema_for!(Config)
    }
}
