use serde::Serialize;

/// Coarse change notification delivered to the subscription callback
///
/// The server only says that "something about sinks or the server changed",
/// never which sink or value, so every event carries the same sentinel
/// payload. Receivers re-query whatever they care about.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Always empty
    pub sink: String,
    /// Always [`ChangeEvent::SENTINEL_VOLUME`]
    pub volume: f64,
    /// Always `None`
    pub muted: Option<bool>,
}

impl ChangeEvent {
    /// Volume carried by every change notification
    pub const SENTINEL_VOLUME: f64 = -1.0;

    /// The "re-query if you care" notification
    pub fn sentinel() -> Self {
        Self {
            sink: String::new(),
            volume: Self::SENTINEL_VOLUME,
            muted: None,
        }
    }

    /// Whether this event is the undifferentiated sentinel
    pub fn is_sentinel(&self) -> bool {
        self.sink.is_empty() && self.volume < 0.0 && self.muted.is_none()
    }
}

/// Default sink state resolved after a change notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinkEvent {
    /// Default sink name at resolution time
    pub sink: String,
    /// Average volume as percent of normal
    pub volume: f64,
    /// Mute state
    pub muted: bool,
}
