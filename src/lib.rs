//! pawpulse - blocking control surface for PulseAudio sinks.
//!
//! An [`AudioSession`](services::pulse::AudioSession) connects to the audio
//! server and answers synchronous queries and updates of sink volume and
//! mute state. Hosts that need to react to changes register a single
//! callback, or use a [`SinkMonitor`](services::pulse::SinkMonitor) for
//! resolved default-sink events.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pawpulse::services::pulse::{AudioSession, ConnectionSettings};
//!
//! let session = AudioSession::new(ConnectionSettings::default());
//! session.open()?;
//!
//! let sink = session.default_sink()?;
//! let info = session.sink_info(&sink)?;
//! println!("{sink}: {:.0}%", info.volume);
//!
//! session.set_volume(&sink, 40.0)?;
//! session.close();
//! # Ok::<(), pawpulse::services::pulse::AudioError>(())
//! ```

/// Configuration schema definitions and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface.
pub mod cli;

/// Audio server integration.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{PawError, Result};
