/// PulseAudio sink control
pub mod pulse;

pub use pulse::{AudioError, AudioSession, SessionState, SinkEvent, SinkMonitor, SinkSnapshot};
