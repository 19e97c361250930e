use std::{
    sync::{Arc, Mutex, PoisonError, mpsc},
    time::Duration,
};

use crate::services::pulse::{AudioError, ChangeEvent, SinkSnapshot};

/// Channel sender for coarse change notifications
pub type ChangeSender = mpsc::Sender<ChangeEvent>;

/// One-shot reply channel handed to the worker with each request
pub type Reply<T> = mpsc::SyncSender<Result<T, AudioError>>;

/// Connection parameters for the PulseAudio backend
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Context name, also published as `application.name`
    pub client_name: String,
    /// Server string; `None` lets libpulse pick the default server
    pub server: Option<String>,
    /// Upper bound for connecting and for each request; `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            client_name: "pawpulse".to_string(),
            server: None,
            timeout: None,
        }
    }
}

/// Requests executed on the session worker
#[derive(Debug)]
pub enum PulseCommand {
    /// Query server info for the default sink name
    DefaultSink {
        /// Completion channel
        reply: Reply<String>,
    },
    /// Query one sink by name
    SinkInfo {
        /// Sink name
        sink: String,
        /// Completion channel
        reply: Reply<SinkSnapshot>,
    },
    /// Set a sink's volume
    SetVolume {
        /// Sink name
        sink: String,
        /// Percent of normal volume
        percent: f64,
        /// Completion channel
        reply: Reply<()>,
    },
    /// Set a sink's mute state
    SetMute {
        /// Sink name
        sink: String,
        /// Mute state
        muted: bool,
        /// Completion channel
        reply: Reply<()>,
    },
    /// Start forwarding sink and server events
    Subscribe {
        /// Completion channel
        reply: Reply<()>,
    },
    /// Disconnect and stop the worker
    Shutdown,
}

/// Reply channel shared between the worker and a libpulse callback
///
/// Whoever settles it first wins; later completions are dropped.
pub struct ReplySlot<T>(Arc<Mutex<Option<Reply<T>>>>);

impl<T> Clone for ReplySlot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Send + 'static> ReplySlot<T> {
    /// Wrap a reply channel
    pub fn new(reply: Reply<T>) -> Self {
        Self(Arc::new(Mutex::new(Some(reply))))
    }

    /// Deliver the result if nobody has yet
    pub fn complete(&self, result: Result<T, AudioError>) {
        let sender = self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(sender) = sender {
            let _ = sender.send(result);
        }
    }

    fn is_settled(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

trait PendingReply {
    fn cancel(&self);
    fn is_settled(&self) -> bool;
}

impl<T: Send + 'static> PendingReply for ReplySlot<T> {
    fn cancel(&self) {
        self.complete(Err(AudioError::Cancelled));
    }

    fn is_settled(&self) -> bool {
        ReplySlot::is_settled(self)
    }
}

/// Requests issued to the server whose callbacks have not fired yet
///
/// libpulse drops pending operations without calling back when the context
/// goes away, so the worker cancels whatever is left here on shutdown.
#[derive(Default)]
pub struct PendingReplies {
    slots: Vec<Box<dyn PendingReply>>,
}

impl PendingReplies {
    /// Start tracking a reply channel
    pub fn track<T: Send + 'static>(&mut self, reply: Reply<T>) -> ReplySlot<T> {
        self.slots.retain(|slot| !slot.is_settled());

        let slot = ReplySlot::new(reply);
        self.slots.push(Box::new(slot.clone()));
        slot
    }

    /// Fail every unsettled request with [`AudioError::Cancelled`]
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for slot in self.slots.drain(..) {
            if !slot.is_settled() {
                slot.cancel();
                cancelled += 1;
            }
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn first_completion_wins() {
        let (tx, rx) = mpsc::sync_channel(1);
        let slot = ReplySlot::new(tx);

        slot.complete(Ok(1));
        slot.complete(Ok(2));

        assert_eq!(rx.recv().unwrap(), Ok(1));
        assert!(rx.recv().is_err());
    }

    #[test]
    fn cancel_all_fails_only_unsettled_requests() {
        let mut pending = PendingReplies::default();
        let (done_tx, done_rx) = mpsc::sync_channel::<Result<(), AudioError>>(1);
        let (open_tx, open_rx) = mpsc::sync_channel::<Result<String, AudioError>>(1);

        let done = pending.track(done_tx);
        let _open = pending.track(open_tx);
        done.complete(Ok(()));

        assert_eq!(pending.cancel_all(), 1);
        assert_eq!(done_rx.recv().unwrap(), Ok(()));
        assert_eq!(open_rx.recv().unwrap(), Err(AudioError::Cancelled));
    }

    #[test]
    fn settled_slots_are_pruned_on_track() {
        let mut pending = PendingReplies::default();
        for _ in 0..3 {
            let (tx, _rx) = mpsc::sync_channel::<Result<(), AudioError>>(1);
            pending.track(tx).complete(Ok(()));
        }
        let (tx, _rx) = mpsc::sync_channel::<Result<(), AudioError>>(1);
        pending.track(tx);

        assert_eq!(pending.slots.len(), 1);
    }
}
