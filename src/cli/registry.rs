use std::{collections::HashMap, sync::Arc};

use crate::config::Config;

use super::{
    CliError, Command,
    commands::{
        audio::{self, AudioClient},
        config,
    },
    types::CommandMetadata,
};

/// Registry for CLI commands organized by category.
///
/// ```text
/// registry
/// ├── audio
/// │   ├── info
/// │   ├── mute
/// │   ├── sink
/// │   ├── volume
/// │   └── watch
/// └── config
///     ├── get
///     └── schema
/// ```
pub struct CommandRegistry {
    /// category name -> (command name -> command implementation)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
    config: Arc<Config>,
    audio: Arc<AudioClient>,
}

impl CommandRegistry {
    /// Creates an empty registry holding the shared command dependencies.
    pub fn new(config: Arc<Config>, audio: Arc<AudioClient>) -> Self {
        Self {
            categories: HashMap::new(),
            config,
            audio,
        }
    }

    /// Registers a command in the specified category.
    ///
    /// A command with the same name in that category is replaced.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(command.metadata().name, command);
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` for an unknown category or
    /// command, `CliError::InvalidArguments` for a wrong argument count, and
    /// whatever the command itself returns.
    pub fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        let found_category = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        let found_command = found_category.get(command_name).ok_or_else(|| {
            CliError::CommandNotFound(format!(
                "Failed to find command '{command_name}' in '{category}'"
            ))
        })?;

        Self::validate_args(&found_command.metadata(), args)?;

        found_command.execute(args)
    }

    /// Lists all registered commands organized by category, sorted.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.sort();

        categories
    }

    /// Metadata of every command in `category`, sorted by name.
    pub fn category_metadata(&self, category: &str) -> Vec<CommandMetadata> {
        let mut metadata: Vec<CommandMetadata> = self
            .categories
            .get(category)
            .map(|commands| commands.values().map(|command| command.metadata()).collect())
            .unwrap_or_default();

        metadata.sort_by(|a, b| a.name.cmp(&b.name));
        metadata
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();

        if args.len() < required_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at least {} arguments, got {}",
                required_count,
                args.len(),
            )));
        }

        if args.len() > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {} arguments, got {}",
                total_count,
                args.len(),
            )));
        }

        Ok(())
    }

    /// Registers every built-in command.
    pub fn register_all_commands(&mut self) {
        let config = self.config.clone();
        let audio = self.audio.clone();

        audio::register_commands(self, audio);
        config::register_commands(self, config);
    }
}
