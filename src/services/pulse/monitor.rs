use std::{sync::Arc, time::Duration};

use async_stream::stream;
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, instrument};

use super::{AudioError, AudioSession, SessionState, SinkEvent};

const EVENTS_BUFFER_SIZE: usize = 100;
const LIVENESS_INTERVAL: Duration = Duration::from_millis(250);

/// Resolve the default sink into a full event
///
/// # Errors
/// `SinkNotFound("")` when the server has no default sink, otherwise
/// whatever the underlying queries return.
pub fn resolve_default(session: &AudioSession) -> Result<SinkEvent, AudioError> {
    let sink = session.default_sink()?;
    if sink.is_empty() {
        return Err(AudioError::SinkNotFound(sink));
    }

    let snapshot = session.sink_info(&sink)?;
    Ok(SinkEvent {
        sink,
        volume: snapshot.volume,
        muted: snapshot.muted,
    })
}

/// Fan-out of default sink state on every server change
///
/// Subscribes on start and turns each coarse notification into a
/// [`SinkEvent`] for the current default sink, broadcast to every listener.
/// Notifications that cannot be resolved are skipped.
pub struct SinkMonitor {
    session: Arc<AudioSession>,
    events_tx: broadcast::Sender<SinkEvent>,
}

impl SinkMonitor {
    /// Subscribe `session` and start broadcasting
    ///
    /// The subscription callback only holds the session weakly, so dropping
    /// every other handle still closes it.
    ///
    /// # Errors
    /// Returns the subscription error; the session must already be open.
    #[instrument(skip(session))]
    pub fn start(session: Arc<AudioSession>) -> Result<Self, AudioError> {
        let (events_tx, _) = broadcast::channel(EVENTS_BUFFER_SIZE);

        let weak = Arc::downgrade(&session);
        let tx = events_tx.clone();
        session.subscribe(move |_| {
            if tx.receiver_count() == 0 {
                return;
            }
            let Some(session) = weak.upgrade() else {
                return;
            };

            match resolve_default(&session) {
                Ok(event) => {
                    let _ = tx.send(event);
                }
                Err(error) => debug!(%error, "Skipping unresolved sink change"),
            }
        })?;

        Ok(Self { session, events_tx })
    }

    /// Resolve the default sink right now
    ///
    /// # Errors
    /// As [`resolve_default`]
    pub fn current(&self) -> Result<SinkEvent, AudioError> {
        resolve_default(&self.session)
    }

    /// New receiver for events broadcast from now on
    pub fn listener(&self) -> broadcast::Receiver<SinkEvent> {
        self.events_tx.subscribe()
    }

    /// Stream of events broadcast from now on
    ///
    /// A slow consumer loses the oldest events rather than blocking the
    /// notifier. The stream ends once the session is no longer ready.
    pub fn events(&self) -> impl Stream<Item = SinkEvent> + Send + use<> {
        let mut events_rx = self.events_tx.subscribe();
        let session = Arc::downgrade(&self.session);
        stream! {
            let mut liveness = tokio::time::interval(LIVENESS_INTERVAL);
            loop {
                let received = tokio::select! {
                    received = events_rx.recv() => Some(received),
                    _ = liveness.tick() => None,
                };

                match received {
                    Some(Ok(event)) => yield event,
                    Some(Err(RecvError::Lagged(skipped))) => {
                        debug!(skipped, "Sink event consumer lagged");
                    }
                    Some(Err(RecvError::Closed)) => break,
                    None => {
                        let ready = session
                            .upgrade()
                            .is_some_and(|session| session.state() == SessionState::Ready);
                        if !ready {
                            debug!("Session is no longer ready; ending sink events");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Session this monitor observes
    pub fn session(&self) -> &Arc<AudioSession> {
        &self.session
    }
}
