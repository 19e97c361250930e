use std::sync::Arc;

use crate::{config::Config, services::pulse::AudioSession};

use super::{
    CliError, CommandRegistry,
    commands::audio::AudioClient,
    formatting::{format_category, format_command, format_description, format_header},
};

/// High-level service for managing and executing CLI commands.
///
/// Owns the command registry and the audio session the audio commands
/// share. The session connects on the first audio command, so config
/// commands and help never touch the audio server.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a CLI service talking to PulseAudio with `config`'s settings.
    pub fn new(config: Config) -> Self {
        let session = Arc::new(AudioSession::new(config.audio.connection_settings()));
        Self::with_session(config, session)
    }

    /// Creates a CLI service over an existing, possibly unopened, session.
    pub fn with_session(config: Config, session: Arc<AudioSession>) -> Self {
        let audio = Arc::new(AudioClient::new(session, config.audio.clone()));
        let mut registry = CommandRegistry::new(Arc::new(config), audio);
        registry.register_all_commands();

        CliService { registry }
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// `help` as category, or an empty command name, renders help instead.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command doesn't exist in
    /// the category, or the command's own error.
    pub fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        match (category, command_name) {
            ("help", "") => Ok(self.help()),
            ("help", category) | (category, "") => self.category_help(category),
            _ => self.registry.execute(category, command_name, args),
        }
    }

    /// Lists all available commands organized by category.
    pub fn list_all(&self) -> Vec<(String, Vec<String>)> {
        self.registry.list_commands()
    }

    /// Overview of every category and command.
    pub fn help(&self) -> String {
        let mut out = vec![
            format_header("pawpulse - PulseAudio sink control"),
            String::new(),
            format!(
                "Usage: {}",
                format_description("pawpulse <category> <command> [args...]")
            ),
            String::new(),
        ];

        for (category, _) in self.list_all() {
            out.push(format_category(&category));
            for metadata in self.registry.category_metadata(&category) {
                out.push(format!(
                    "  {} {}",
                    format_command(&format!("{:<8}", metadata.name)),
                    format_description(&metadata.description)
                ));
            }
            out.push(String::new());
        }

        out.push(format_description(
            "Run 'pawpulse help <category>' for arguments and examples.",
        ));
        out.join("\n")
    }

    /// Arguments and examples for every command in `category`.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` for an unknown category.
    pub fn category_help(&self, category: &str) -> Result<String, CliError> {
        let commands = self.registry.category_metadata(category);
        if commands.is_empty() {
            return Err(CliError::CommandNotFound(format!(
                "Failed to find category '{category}'"
            )));
        }

        let mut out = vec![format_header(category), String::new()];
        for metadata in commands {
            let usage: Vec<String> = metadata
                .args
                .iter()
                .map(|arg| {
                    if arg.required {
                        format!("<{}>", arg.name)
                    } else {
                        format!("[{}]", arg.name)
                    }
                })
                .collect();

            out.push(format!(
                "{} {}",
                format_command(&metadata.name),
                usage.join(" ")
            ));
            out.push(format!("  {}", metadata.description));
            for arg in &metadata.args {
                out.push(format!(
                    "    {} ({}): {}",
                    arg.name,
                    arg.value_type.hint(),
                    format_description(&arg.description)
                ));
            }
            for example in &metadata.examples {
                out.push(format!("    {}", format_description(example)));
            }
            out.push(String::new());
        }

        Ok(out.join("\n"))
    }
}
