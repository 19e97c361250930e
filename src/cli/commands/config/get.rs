use std::sync::Arc;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_toml_value,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config::Config,
};

/// Prints one value of the effective configuration.
///
/// # Example Usage
///
/// ```bash
/// pawpulse config get audio.max_volume
/// pawpulse config get general.log_level
/// ```
pub struct GetCommand {
    config: Arc<Config>,
}

impl GetCommand {
    /// Creates a new GetCommand over the loaded configuration.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl Command for GetCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = args.first().ok_or_else(|| {
            CliError::InvalidArguments("Expected <path> argument for 'get' command".to_string())
        })?;

        let value = self.config.get_by_path(path)?;

        Ok(format!("{}: {}", path, format_toml_value(&value)))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            description: "Get configuration value".to_string(),
            category: "config".to_string(),
            args: vec![CommandArg {
                name: "path".to_string(),
                description: "Configuration path (e.g., audio.max_volume)".to_string(),
                required: true,
                value_type: ArgType::Path,
            }],
            examples: vec![
                "pawpulse config get audio.max_volume".to_string(),
                "pawpulse config get general.log_level".to_string(),
            ],
        }
    }
}
