/// Sink queries, volume and mute control
pub mod audio;
/// Configuration inspection
pub mod config;
