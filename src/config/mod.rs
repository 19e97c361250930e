//! Configuration schema and loading.
//!
//! pawpulse reads a single TOML file. Every section and field is optional,
//! so an empty or missing file yields the defaults.

mod audio;
mod general;
mod loading;
mod paths;

#[cfg(test)]
mod tests;

pub use audio::AudioConfig;
pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure for pawpulse.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Audio server connection and volume limits.
    #[serde(default)]
    pub audio: AudioConfig,
}
