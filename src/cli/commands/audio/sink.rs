use std::sync::Arc;

use crate::cli::{
    Command, CommandResult,
    types::CommandMetadata,
};

use super::AudioClient;

/// Prints the name of the server's default sink
pub struct SinkCommand {
    audio: Arc<AudioClient>,
}

impl SinkCommand {
    /// Creates a new SinkCommand
    pub fn new(audio: Arc<AudioClient>) -> Self {
        Self { audio }
    }
}

impl Command for SinkCommand {
    fn execute(&self, _args: &[String]) -> CommandResult {
        self.audio.resolve_sink(None)
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "sink".to_string(),
            description: "Print the default sink name".to_string(),
            category: "audio".to_string(),
            args: vec![],
            examples: vec!["pawpulse audio sink".to_string()],
        }
    }
}
