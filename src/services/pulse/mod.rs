//! PulseAudio sink control
//!
//! [`AudioSession`] connects to the server and offers blocking queries and
//! updates of sink volume and mute state, plus a coarse change subscription.
//! [`SinkMonitor`] builds resolved default-sink events on top of it.

/// Server backends behind the session
pub mod backend;
/// Error types
pub mod error;
/// Change notification payloads
pub mod events;
/// Default sink event fan-out
pub mod monitor;
mod session;
/// In-memory backend
pub mod testing;
/// Snapshot and lifecycle types
pub mod types;

pub use backend::{AudioBackend, ConnectionSettings, PulseBackend};
pub use error::{AudioError, AudioErrorKind};
pub use events::{ChangeEvent, SinkEvent};
pub use monitor::SinkMonitor;
pub use session::{AudioSession, ChangeCallback};
pub use types::{SessionState, SinkSnapshot};
