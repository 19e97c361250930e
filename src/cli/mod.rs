//! Command-line interface.
//!
//! Commands are grouped by category in a [`CommandRegistry`] and describe
//! themselves through metadata, which also drives the help output.

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use commands::{
    audio::{AudioClient, DEFAULT_SINK_ALIAS, MuteAction, VolumeChange},
    config::GetCommand,
};
pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult};
