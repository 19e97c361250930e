//! Audio sink commands.
mod info;
mod mute;
mod sink;
mod volume;
mod watch;

use std::sync::Arc;

pub use info::InfoCommand;
pub use mute::{MuteAction, MuteCommand};
pub use sink::SinkCommand;
pub use volume::{VolumeChange, VolumeCommand};
pub use watch::WatchCommand;

use crate::{
    cli::{CliError, CommandRegistry},
    config::AudioConfig,
    services::pulse::{AudioError, AudioSession},
};

/// Sink name that stands for the server's current default sink.
pub const DEFAULT_SINK_ALIAS: &str = "@default";

/// Audio session shared by the audio commands
///
/// The session is opened on first use; later calls reuse the connection.
pub struct AudioClient {
    session: Arc<AudioSession>,
    config: AudioConfig,
}

impl AudioClient {
    /// Wrap an unopened session with the limits from `config`
    pub fn new(session: Arc<AudioSession>, config: AudioConfig) -> Self {
        Self { session, config }
    }

    /// Open the session if needed and return it
    ///
    /// # Errors
    /// Returns the connection error from [`AudioSession::open`]
    pub fn session(&self) -> Result<&Arc<AudioSession>, CliError> {
        self.session.open()?;
        Ok(&self.session)
    }

    /// Volume limits and steps
    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Resolve an optional sink argument to a concrete sink name
    ///
    /// A missing argument and [`DEFAULT_SINK_ALIAS`] both mean the default
    /// sink.
    ///
    /// # Errors
    /// `SinkNotFound("")` when the server has no default sink, otherwise the
    /// query error.
    pub fn resolve_sink(&self, sink: Option<&str>) -> Result<String, CliError> {
        match sink {
            Some(name) if name != DEFAULT_SINK_ALIAS => Ok(name.to_string()),
            _ => {
                let name = self.session()?.default_sink()?;
                if name.is_empty() {
                    return Err(AudioError::SinkNotFound(name).into());
                }
                Ok(name)
            }
        }
    }
}

/// Registers all audio commands in the "audio" category.
pub fn register_commands(registry: &mut CommandRegistry, audio: Arc<AudioClient>) {
    const CATEGORY_NAME: &str = "audio";

    registry.register_command(CATEGORY_NAME, Box::new(SinkCommand::new(audio.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(InfoCommand::new(audio.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(VolumeCommand::new(audio.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(MuteCommand::new(audio.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(WatchCommand::new(audio)));
}
