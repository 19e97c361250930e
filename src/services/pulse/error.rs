use std::time::Duration;

/// PulseAudio session errors
///
/// Only the coarse kind is meant to cross the host boundary; the attached
/// strings are diagnostics for logging.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Mainloop, context, or worker thread could not be created
    #[error("failed to allocate PulseAudio resources: {0}")]
    AllocFailed(String),

    /// Server unreachable or connection rejected
    #[error("PulseAudio connection failed: {0}")]
    ConnectFailed(String),

    /// Session is not open, or has been closed
    #[error("PulseAudio session is not ready")]
    NotReady,

    /// The request could not be issued or the server rejected it
    #[error("PulseAudio request failed: {0}")]
    RequestFailed(String),

    /// Named sink does not exist
    #[error("sink '{0}' not found")]
    SinkNotFound(String),

    /// Volume percent is negative or not a finite number
    #[error("invalid volume {0} (must be a finite, non-negative percent)")]
    InvalidVolume(f64),

    /// The server did not answer within the configured timeout
    #[error("PulseAudio request timed out after {0:?}")]
    Timeout(Duration),

    /// The session was closed while the request was in flight
    #[error("PulseAudio request cancelled by session close")]
    Cancelled,
}

/// Coarse error classification for foreign callers
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioErrorKind {
    /// See [`AudioError::AllocFailed`]
    AllocFailed = -1,
    /// See [`AudioError::ConnectFailed`]
    ConnectFailed = -2,
    /// See [`AudioError::NotReady`]
    NotReady = -3,
    /// See [`AudioError::RequestFailed`]
    RequestFailed = -4,
    /// See [`AudioError::SinkNotFound`]
    SinkNotFound = -5,
    /// See [`AudioError::InvalidVolume`]
    InvalidVolume = -6,
    /// See [`AudioError::Timeout`]
    Timeout = -7,
    /// See [`AudioError::Cancelled`]
    Cancelled = -8,
}

impl AudioErrorKind {
    /// Stable integer code for this kind
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl AudioError {
    /// Coarse kind of this error, without diagnostics
    pub fn kind(&self) -> AudioErrorKind {
        match self {
            AudioError::AllocFailed(_) => AudioErrorKind::AllocFailed,
            AudioError::ConnectFailed(_) => AudioErrorKind::ConnectFailed,
            AudioError::NotReady => AudioErrorKind::NotReady,
            AudioError::RequestFailed(_) => AudioErrorKind::RequestFailed,
            AudioError::SinkNotFound(_) => AudioErrorKind::SinkNotFound,
            AudioError::InvalidVolume(_) => AudioErrorKind::InvalidVolume,
            AudioError::Timeout(_) => AudioErrorKind::Timeout,
            AudioError::Cancelled => AudioErrorKind::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn kind_drops_diagnostics() {
        let a = AudioError::SinkNotFound("a".to_string());
        let b = AudioError::SinkNotFound("b".to_string());

        assert_ne!(a, b);
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.kind().code(), -5);
    }

    #[test]
    fn codes_are_distinct() {
        let kinds = [
            AudioErrorKind::AllocFailed,
            AudioErrorKind::ConnectFailed,
            AudioErrorKind::NotReady,
            AudioErrorKind::RequestFailed,
            AudioErrorKind::SinkNotFound,
            AudioErrorKind::InvalidVolume,
            AudioErrorKind::Timeout,
            AudioErrorKind::Cancelled,
        ];
        let mut codes: Vec<i32> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();

        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn display_keeps_sink_name() {
        let error = AudioError::SinkNotFound("nonexistent-sink".to_string());
        assert_eq!(error.to_string(), "sink 'nonexistent-sink' not found");
    }
}
