use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{PawError, Result, services::pulse::ConnectionSettings};

/// Audio server connection and CLI volume limits.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Client name shown by the server, also used as `application.name`.
    pub client_name: String,

    /// Server address such as `unix:/run/user/1000/pulse/native`.
    /// The default server is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Upper bound in milliseconds for connecting and for each request.
    /// Zero waits forever.
    pub request_timeout_ms: u64,

    /// Highest percent the CLI will set, including relative steps.
    pub max_volume: f64,

    /// Step in percent used by relative volume changes without a number.
    pub volume_step: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            client_name: "pawpulse".to_string(),
            server: None,
            request_timeout_ms: 5000,
            max_volume: 150.0,
            volume_step: 5.0,
        }
    }
}

impl AudioConfig {
    /// Request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Settings for opening an audio session.
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            client_name: self.client_name.clone(),
            server: self.server.clone(),
            timeout: self.request_timeout(),
        }
    }

    /// Reject values no session or command could work with.
    ///
    /// # Errors
    /// Returns `PawError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(invalid("audio.client_name", "must not be empty"));
        }
        if !self.max_volume.is_finite() || self.max_volume <= 0.0 {
            return Err(invalid("audio.max_volume", "must be a positive percent"));
        }
        if !self.volume_step.is_finite() || self.volume_step <= 0.0 {
            return Err(invalid("audio.volume_step", "must be a positive percent"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> PawError {
    PawError::Config {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
