use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

use crate::services::pulse::AudioError;

/// Error types for the pawpulse application.
///
/// Covers configuration loading and the audio session, so binaries can
/// propagate everything with `?`.
#[derive(Error, Debug)]
pub enum PawError {
    /// Configuration value out of range or otherwise unusable
    #[error("invalid config field '{field}': {reason}")]
    Config {
        /// Dotted path of the offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// I/O error tied to a specific path
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where the error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParse {
        /// File path, or "string" for in-memory input
        location: String,
        /// Parse error details
        details: String,
    },

    /// Audio session error
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// A specialized `Result` type for pawpulse operations.
pub type Result<T> = result::Result<T, PawError>;

impl PawError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        PawError::TomlParse {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an I/O error carrying the path it happened on.
    pub fn io_at(error: impl fmt::Display, path: &Path) -> Self {
        PawError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn toml_parse_without_path_uses_string_location() {
        let error = PawError::toml_parse("expected `=`", None);
        assert_eq!(
            error.to_string(),
            "failed to parse TOML at 'string': expected `=`"
        );
    }

    #[test]
    fn audio_errors_convert_transparently() {
        let error: PawError = AudioError::SinkNotFound("hdmi".to_string()).into();
        assert_eq!(error.to_string(), "sink 'hdmi' not found");
    }
}
