use std::sync::Arc;

use futures::StreamExt;
use tracing::info;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_sink_state,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    services::pulse::{SinkEvent, SinkMonitor},
};

use super::AudioClient;

/// Prints the default sink's state on every change until Ctrl+C
pub struct WatchCommand {
    audio: Arc<AudioClient>,
}

impl WatchCommand {
    /// Creates a new WatchCommand
    pub fn new(audio: Arc<AudioClient>) -> Self {
        Self { audio }
    }
}

fn render(event: &SinkEvent, json: bool) -> Result<String, CliError> {
    if json {
        serde_json::to_string(event)
            .map_err(|e| CliError::ServiceError(format!("Failed to encode event: {e}")))
    } else {
        Ok(format_sink_state(&event.sink, event.volume, event.muted))
    }
}

impl Command for WatchCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let json = match args.first().map(String::as_str) {
            None => false,
            Some("json") => true,
            Some(other) => {
                return Err(CliError::InvalidArguments(format!(
                    "Unknown output format '{other}' (expected json)"
                )));
            }
        };

        let monitor = SinkMonitor::start(self.audio.session()?.clone())?;
        let mut events = Box::pin(monitor.events());

        match monitor.current() {
            Ok(event) => println!("{}", render(&event, json)?),
            Err(error) => info!(%error, "No default sink yet"),
        }
        if !json {
            println!("Press Ctrl+C to stop");
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::ServiceError(format!("Failed to create runtime: {e}")))?;

        runtime.block_on(async {
            loop {
                tokio::select! {
                    event = events.next() => {
                        let Some(event) = event else { break };
                        println!("{}", render(&event, json)?);
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            Ok::<(), CliError>(())
        })?;

        Ok(String::new())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "watch".to_string(),
            description: "Print the default sink's state whenever it changes".to_string(),
            category: "audio".to_string(),
            args: vec![CommandArg {
                name: "format".to_string(),
                description: "Pass json for one JSON object per line".to_string(),
                required: false,
                value_type: ArgType::String,
            }],
            examples: vec![
                "pawpulse audio watch".to_string(),
                "pawpulse audio watch json".to_string(),
            ],
        }
    }
}
