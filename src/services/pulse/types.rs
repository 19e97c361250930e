use std::fmt;

/// Point-in-time view of one sink
///
/// Produced fresh by every query; the session never caches it.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkSnapshot {
    /// Sink name as known to the server
    pub name: String,
    /// Arithmetic mean of channel volumes as percent of normal.
    /// Boosted sinks report values above 100.
    pub volume: f64,
    /// Mute state
    pub muted: bool,
}

/// Lifecycle of an [`AudioSession`](super::AudioSession)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, `open` not called yet
    Uninitialized,
    /// `open` is waiting for the server
    Connecting,
    /// Connected; operations are accepted
    Ready,
    /// Connection attempt failed; terminal
    Failed,
    /// Closed by the host; terminal
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Connecting => "connecting",
            SessionState::Ready => "ready",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
