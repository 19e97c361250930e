use std::sync::Arc;

use crate::cli::{
    CliError, Command, CommandResult,
    types::{ArgType, CommandArg, CommandMetadata},
};

use super::AudioClient;

/// What to do with a sink's mute state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteAction {
    /// Mute
    On,
    /// Unmute
    Off,
    /// Flip the current state
    Toggle,
}

impl MuteAction {
    /// Parse an optional switch argument; missing means toggle
    ///
    /// # Errors
    /// Returns `InvalidArguments` for unrecognized words
    pub fn parse(value: Option<&str>) -> Result<Self, CliError> {
        let Some(value) = value else {
            return Ok(MuteAction::Toggle);
        };

        match value.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(MuteAction::On),
            "off" | "false" | "no" | "0" => Ok(MuteAction::Off),
            "toggle" => Ok(MuteAction::Toggle),
            _ => Err(CliError::InvalidArguments(format!(
                "'{value}' is not a mute state (expected on, off, or toggle)"
            ))),
        }
    }
}

/// Mutes, unmutes, or toggles a sink
pub struct MuteCommand {
    audio: Arc<AudioClient>,
}

impl MuteCommand {
    /// Creates a new MuteCommand
    pub fn new(audio: Arc<AudioClient>) -> Self {
        Self { audio }
    }
}

impl Command for MuteCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let sink = args.first().ok_or_else(|| {
            CliError::InvalidArguments("Expected <sink> argument for 'mute' command".to_string())
        })?;

        let action = MuteAction::parse(args.get(1).map(String::as_str))?;
        let sink = self.audio.resolve_sink(Some(sink))?;
        let session = self.audio.session()?;

        let muted = match action {
            MuteAction::On => true,
            MuteAction::Off => false,
            MuteAction::Toggle => !session.sink_info(&sink)?.muted,
        };
        session.set_mute(&sink, muted)?;

        let verb = if muted { "Muted" } else { "Unmuted" };
        Ok(format!("{verb} {sink}"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "mute".to_string(),
            description: "Mute, unmute, or toggle a sink".to_string(),
            category: "audio".to_string(),
            args: vec![
                CommandArg {
                    name: "sink".to_string(),
                    description: "Sink name, or @default".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
                CommandArg {
                    name: "state".to_string(),
                    description: "on, off, or toggle (the default)".to_string(),
                    required: false,
                    value_type: ArgType::Boolean,
                },
            ],
            examples: vec![
                "pawpulse audio mute @default".to_string(),
                "pawpulse audio mute @default off".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn missing_state_toggles() {
        assert_eq!(MuteAction::parse(None).unwrap(), MuteAction::Toggle);
    }

    #[test]
    fn accepts_common_switch_words() {
        assert_eq!(MuteAction::parse(Some("ON")).unwrap(), MuteAction::On);
        assert_eq!(MuteAction::parse(Some("false")).unwrap(), MuteAction::Off);
        assert_eq!(
            MuteAction::parse(Some("toggle")).unwrap(),
            MuteAction::Toggle
        );
        assert!(MuteAction::parse(Some("maybe")).is_err());
    }
}
