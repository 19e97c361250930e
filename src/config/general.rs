use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings that apply to every command.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct GeneralConfig {
    /// Default log filter, used when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Verbosity of log output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Failures only.
    Error,
    /// Failures and recoverable problems.
    Warn,
    /// Connection lifecycle and the above.
    #[default]
    Info,
    /// Every request sent to the audio server.
    Debug,
    /// Raw server events.
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}
