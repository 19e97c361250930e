use std::sync::Arc;

use crate::cli::{
    CliError, Command, CommandResult,
    types::{ArgType, CommandArg, CommandMetadata},
};

use super::AudioClient;

/// Requested volume, in percent of normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeChange {
    /// Set exactly this percent
    Absolute(f64),
    /// Add this (possibly negative) percent to the current volume
    Relative(f64),
}

impl VolumeChange {
    /// Parse `40`, `+5`, `-5`, or a bare `+`/`-` meaning one `step`
    ///
    /// # Errors
    /// Returns `InvalidArguments` for anything that is not a finite number
    pub fn parse(value: &str, step: f64) -> Result<Self, CliError> {
        let invalid = || {
            CliError::InvalidArguments(format!(
                "'{value}' is not a volume (expected 40, +5, -5, + or -)"
            ))
        };

        let change = match value {
            "+" => VolumeChange::Relative(step),
            "-" => VolumeChange::Relative(-step),
            _ if value.starts_with(['+', '-']) => {
                VolumeChange::Relative(value.parse().map_err(|_| invalid())?)
            }
            _ => VolumeChange::Absolute(value.parse().map_err(|_| invalid())?),
        };

        match change {
            VolumeChange::Absolute(v) | VolumeChange::Relative(v) if !v.is_finite() => {
                Err(invalid())
            }
            change => Ok(change),
        }
    }

    /// Target percent for a sink currently at `current`
    ///
    /// Absolute values are kept in `[0, max]`. A relative change never
    /// pushes past `max`, but a sink already boosted beyond it is not pulled
    /// down by a raise.
    pub fn apply(self, current: f64, max: f64) -> f64 {
        match self {
            VolumeChange::Absolute(percent) => percent.clamp(0.0, max),
            VolumeChange::Relative(delta) => (current + delta).clamp(0.0, max.max(current)),
        }
    }
}

/// Sets a sink's volume, absolutely or relative to its current level
pub struct VolumeCommand {
    audio: Arc<AudioClient>,
}

impl VolumeCommand {
    /// Creates a new VolumeCommand
    pub fn new(audio: Arc<AudioClient>) -> Self {
        Self { audio }
    }
}

impl Command for VolumeCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let (Some(sink), Some(value)) = (args.first(), args.get(1)) else {
            return Err(CliError::InvalidArguments(
                "Expected <sink> <value> arguments for 'volume' command".to_string(),
            ));
        };

        let config = self.audio.config();
        let change = VolumeChange::parse(value, config.volume_step)?;
        let sink = self.audio.resolve_sink(Some(sink))?;
        let session = self.audio.session()?;

        let current = match change {
            VolumeChange::Absolute(_) => 0.0,
            VolumeChange::Relative(_) => session.sink_info(&sink)?.volume,
        };
        let target = change.apply(current, config.max_volume);
        session.set_volume(&sink, target)?;

        Ok(format!("Set volume of {sink} to {target:.0}%"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "volume".to_string(),
            description: "Set a sink's volume in percent".to_string(),
            category: "audio".to_string(),
            args: vec![
                CommandArg {
                    name: "sink".to_string(),
                    description: "Sink name, or @default".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
                CommandArg {
                    name: "value".to_string(),
                    description: "Absolute percent (40) or relative change (+5, -5, +, -)"
                        .to_string(),
                    required: true,
                    value_type: ArgType::Number,
                },
            ],
            examples: vec![
                "pawpulse audio volume @default 40".to_string(),
                "pawpulse audio volume @default +5".to_string(),
                "pawpulse audio volume alsa_output.usb -".to_string(),
            ],
        }
    }
}
