use std::sync::Arc;

use crate::cli::{
    Command, CommandResult,
    formatting::format_sink_state,
    types::{ArgType, CommandArg, CommandMetadata},
};

use super::AudioClient;

/// Shows volume and mute state of one sink
pub struct InfoCommand {
    audio: Arc<AudioClient>,
}

impl InfoCommand {
    /// Creates a new InfoCommand
    pub fn new(audio: Arc<AudioClient>) -> Self {
        Self { audio }
    }
}

impl Command for InfoCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let sink = self.audio.resolve_sink(args.first().map(String::as_str))?;
        let snapshot = self.audio.session()?.sink_info(&sink)?;

        Ok(format_sink_state(&sink, snapshot.volume, snapshot.muted))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "info".to_string(),
            description: "Show volume and mute state of a sink".to_string(),
            category: "audio".to_string(),
            args: vec![CommandArg {
                name: "sink".to_string(),
                description: "Sink name, or @default (the default when omitted)".to_string(),
                required: false,
                value_type: ArgType::String,
            }],
            examples: vec![
                "pawpulse audio info".to_string(),
                "pawpulse audio info alsa_output.pci-0000_00_1f.3.analog-stereo".to_string(),
            ],
        }
    }
}
