use thiserror::Error;

use crate::{PawError, services::pulse::AudioError};

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Wrong argument count or an argument that does not parse.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The configuration could not be read or has no such value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The audio server refused or failed a request.
    ///
    /// Kept as the session's own error so callers can branch on the kind.
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// A general service error occurred, such as a runtime that failed to
    /// start.
    #[error("Service error: {0}")]
    ServiceError(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<PawError> for CliError {
    fn from(error: PawError) -> Self {
        match error {
            PawError::Audio(error) => CliError::Audio(error),
            PawError::Io(error) => CliError::IoError(error),
            error => CliError::ConfigError(error.to_string()),
        }
    }
}

/// Output of a successful command, or what went wrong.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "sink", "value").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected type of this argument for validation and help display.
    pub value_type: ArgType,
}

/// Type classification for command arguments, shown in help.
#[derive(Debug, Clone)]
pub enum ArgType {
    /// A general string value.
    String,

    /// A numeric value, optionally signed for relative changes.
    Number,

    /// A boolean-ish switch such as `on`/`off`.
    Boolean,

    /// A dotted configuration path.
    Path,
}

impl ArgType {
    /// Short hint used in usage lines.
    pub fn hint(&self) -> &'static str {
        match self {
            ArgType::String => "string",
            ArgType::Number => "number",
            ArgType::Boolean => "switch",
            ArgType::Path => "path",
        }
    }
}

/// Complete metadata for a CLI command.
///
/// Drives help generation and argument count validation.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "volume", "get").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Specification of all arguments this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "audio", "config").
    pub category: String,
}

/// Trait implemented by every CLI command.
///
/// Commands receive their dependencies through their constructors.
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already checked the argument count against
    /// [`metadata`](Self::metadata); commands validate the values.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for invalid argument values, configuration
    /// lookups that fail, and audio requests the server rejects.
    fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
