use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc},
    thread::{self, JoinHandle},
};

use tracing::{debug, info, instrument, warn};

use super::{
    AudioError, ChangeEvent, SessionState, SinkSnapshot,
    backend::{AudioBackend, ConnectionSettings, PulseBackend},
};

/// Host callback for change notifications
pub type ChangeCallback = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

type ListenerSlot = Arc<Mutex<Option<ChangeCallback>>>;

struct SessionInner {
    state: SessionState,
    dispatcher: Option<JoinHandle<()>>,
}

/// Connection to the audio server with blocking request/response calls
///
/// Each session owns its backend, so several can coexist in one process.
/// Every operation except [`open`](Self::open) returns
/// [`AudioError::NotReady`] unless the session is [`SessionState::Ready`].
///
/// The session lock is never held while waiting for the server, and the
/// subscription callback runs on a dedicated notifier thread, so the callback
/// may call straight back into the session.
pub struct AudioSession {
    backend: Arc<dyn AudioBackend>,
    inner: Mutex<SessionInner>,
    listener: ListenerSlot,
}

impl fmt::Debug for AudioSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioSession")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl AudioSession {
    /// Create an unopened session over PulseAudio
    pub fn new(settings: ConnectionSettings) -> Self {
        Self::with_backend(PulseBackend::new(settings))
    }

    /// Create an unopened session over any backend
    pub fn with_backend(backend: impl AudioBackend) -> Self {
        Self::with_shared_backend(Arc::new(backend))
    }

    /// Create an unopened session over a backend the caller keeps a handle to
    pub fn with_shared_backend(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            inner: Mutex::new(SessionInner {
                state: SessionState::Uninitialized,
                dispatcher: None,
            }),
            listener: Arc::new(Mutex::new(None)),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.inner().state
    }

    /// Connect and block until the server is ready
    ///
    /// Opening a ready session returns immediately without touching the
    /// backend. `Failed` and `Closed` are terminal: construct a new session
    /// to try again.
    ///
    /// The session lock is released while connecting, so other threads can
    /// observe [`SessionState::Connecting`].
    ///
    /// # Errors
    /// `AllocFailed` if the notifier thread or backend resources cannot be
    /// created, `ConnectFailed` if the server is unreachable or this session
    /// failed before, `NotReady` if it was closed or another `open` is in
    /// progress, `Cancelled` if it was closed while connecting.
    #[instrument(skip(self))]
    pub fn open(&self) -> Result<(), AudioError> {
        {
            let mut inner = self.inner();
            match inner.state {
                SessionState::Ready => return Ok(()),
                SessionState::Failed => {
                    return Err(AudioError::ConnectFailed(
                        "session failed earlier; create a new session".to_string(),
                    ));
                }
                SessionState::Closed | SessionState::Connecting => {
                    return Err(AudioError::NotReady);
                }
                SessionState::Uninitialized => {}
            }
            inner.state = SessionState::Connecting;
        }
        debug!("Opening audio session");

        let (events_tx, events_rx) = mpsc::channel();
        let dispatcher = match spawn_dispatcher(events_rx, Arc::clone(&self.listener)) {
            Ok(handle) => handle,
            Err(error) => {
                self.settle_connecting(SessionState::Failed);
                return Err(error);
            }
        };

        // Connect without the session lock so state() and close() stay live.
        if let Err(error) = self.backend.connect(events_tx) {
            warn!(%error, "Audio session failed to open");
            self.settle_connecting(SessionState::Failed);
            // The backend dropped its sender, so the notifier exits on its own.
            let _ = dispatcher.join();
            return Err(error);
        }

        {
            let mut inner = self.inner();
            if inner.state == SessionState::Connecting {
                inner.dispatcher = Some(dispatcher);
                inner.state = SessionState::Ready;
                info!("Audio session ready");
                return Ok(());
            }
        }

        debug!("Audio session closed while connecting");
        self.backend.disconnect();
        let _ = dispatcher.join();
        Err(AudioError::Cancelled)
    }

    /// Disconnect and release the worker
    ///
    /// Idempotent; a no-op on sessions that never opened. Requests still in
    /// flight fail with [`AudioError::Cancelled`]; later calls get `NotReady`.
    /// Closing while another thread is connecting makes that `open` return
    /// `Cancelled`.
    /// Safe to call from inside the subscription callback.
    #[instrument(skip(self))]
    pub fn close(&self) {
        let dispatcher = {
            let mut inner = self.inner();
            match inner.state {
                SessionState::Ready => {}
                // The opening thread sees this and tears the connection down.
                SessionState::Connecting => {
                    inner.state = SessionState::Closed;
                    return;
                }
                _ => return,
            }
            inner.state = SessionState::Closed;
            inner.dispatcher.take()
        };

        self.backend.disconnect();
        self.lock_listener().take();

        if let Some(handle) = dispatcher {
            if handle.thread().id() == thread::current().id() {
                debug!("Audio session closed from its own notifier; not joining");
            } else if handle.join().is_err() {
                warn!("Change notifier panicked");
            }
        }
        info!("Audio session closed");
    }

    /// Name of the server's default sink; empty when there is none
    ///
    /// # Errors
    /// `NotReady`, `RequestFailed`, `Timeout`, or `Cancelled`
    pub fn default_sink(&self) -> Result<String, AudioError> {
        self.ensure_ready()?;
        self.backend.default_sink()
    }

    /// Fresh volume and mute state of `sink`
    ///
    /// Volume is the mean over all channels as percent of normal volume;
    /// boosted sinks report more than 100 and are not clamped here.
    ///
    /// # Errors
    /// `SinkNotFound` if the server has no such sink, otherwise as
    /// [`default_sink`](Self::default_sink)
    pub fn sink_info(&self, sink: &str) -> Result<SinkSnapshot, AudioError> {
        self.ensure_ready()?;
        self.backend.sink_info(sink)
    }

    /// Set every channel of `sink` to `percent` of normal volume
    ///
    /// Values above 100 boost the sink. Clamping to a ceiling is left to the
    /// caller.
    ///
    /// # Errors
    /// `InvalidVolume` for negative or non-finite input, otherwise as
    /// [`sink_info`](Self::sink_info)
    pub fn set_volume(&self, sink: &str, percent: f64) -> Result<(), AudioError> {
        self.ensure_ready()?;
        if !percent.is_finite() || percent < 0.0 {
            return Err(AudioError::InvalidVolume(percent));
        }
        self.backend.set_volume(sink, percent)
    }

    /// Mute or unmute `sink`
    ///
    /// # Errors
    /// As [`sink_info`](Self::sink_info)
    pub fn set_mute(&self, sink: &str, muted: bool) -> Result<(), AudioError> {
        self.ensure_ready()?;
        self.backend.set_mute(sink, muted)
    }

    /// Register `callback` as the change listener
    ///
    /// Blocks until the server acknowledges the subscription. From then on
    /// every sink or server change invokes `callback` with
    /// [`ChangeEvent::sentinel`] on the notifier thread. Subscribing again
    /// replaces the previous callback.
    ///
    /// # Errors
    /// `NotReady`, `RequestFailed`, `Timeout`, or `Cancelled`; the previous
    /// callback stays in place on failure.
    pub fn subscribe<F>(&self, callback: F) -> Result<(), AudioError>
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        self.ensure_ready()?;

        let previous = self.lock_listener().replace(Arc::new(callback));
        if let Err(error) = self.backend.subscribe() {
            *self.lock_listener() = previous;
            return Err(error);
        }

        debug!("Change listener registered");
        Ok(())
    }

    fn settle_connecting(&self, state: SessionState) {
        let mut inner = self.inner();
        if inner.state == SessionState::Connecting {
            inner.state = state;
        }
    }

    fn ensure_ready(&self) -> Result<(), AudioError> {
        match self.inner().state {
            SessionState::Ready => Ok(()),
            _ => Err(AudioError::NotReady),
        }
    }

    fn inner(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listener(&self) -> MutexGuard<'_, Option<ChangeCallback>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for AudioSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Deliver change notifications to the current listener
///
/// The listener is cloned out of its slot before the call, so the callback
/// runs with no session lock held. A panicking callback is logged and the
/// notifier keeps serving later events.
fn spawn_dispatcher(
    events: mpsc::Receiver<ChangeEvent>,
    listener: ListenerSlot,
) -> Result<JoinHandle<()>, AudioError> {
    thread::Builder::new()
        .name("pulse-notify".to_string())
        .spawn(move || {
            for event in events {
                let callback = listener
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                let Some(callback) = callback else {
                    continue;
                };
                if panic::catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                    warn!("Change callback panicked; keeping the notifier alive");
                }
            }
            debug!("Change notifier stopped");
        })
        .map_err(|e| AudioError::AllocFailed(format!("failed to spawn notifier: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;
    use crate::services::pulse::testing::FakeBackend;

    #[test]
    fn new_session_is_uninitialized() {
        let session = AudioSession::with_backend(FakeBackend::new());
        assert_eq!(session.state(), SessionState::Uninitialized);
    }

    #[test]
    fn failed_open_is_terminal() {
        let backend = Arc::new(FakeBackend::new());
        backend.refuse_connections(true);
        let session = AudioSession::with_shared_backend(backend.clone());

        assert!(matches!(session.open(), Err(AudioError::ConnectFailed(_))));
        assert_eq!(session.state(), SessionState::Failed);

        backend.refuse_connections(false);
        assert!(matches!(session.open(), Err(AudioError::ConnectFailed(_))));
        assert_eq!(backend.connect_count(), 1);
    }

    #[test]
    fn closed_session_cannot_reopen() {
        let session = AudioSession::with_backend(FakeBackend::new());
        session.open().unwrap();
        session.close();

        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.open(), Err(AudioError::NotReady));
    }

    #[test]
    fn invalid_volume_is_rejected_before_the_backend() {
        let backend = Arc::new(FakeBackend::new());
        let session = AudioSession::with_shared_backend(backend.clone());
        session.open().unwrap();

        assert_eq!(
            session.set_volume(FakeBackend::DEFAULT_SINK, -1.0),
            Err(AudioError::InvalidVolume(-1.0))
        );
        assert!(matches!(
            session.set_volume(FakeBackend::DEFAULT_SINK, f64::NAN),
            Err(AudioError::InvalidVolume(_))
        ));
        assert_eq!(backend.request_count(), 0);
    }

    #[test]
    fn failed_subscribe_keeps_previous_listener() {
        let backend = Arc::new(FakeBackend::new());
        let session = AudioSession::with_shared_backend(backend.clone());
        session.open().unwrap();

        let first = Arc::new(AtomicUsize::new(0));
        let counter = first.clone();
        session
            .subscribe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        backend.fail_subscriptions(true);
        assert!(session.subscribe(|_| {}).is_err());

        backend.emit_change();
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while first.load(Ordering::SeqCst) == 0 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(first.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn close_from_inside_callback_does_not_deadlock() {
        let session = Arc::new(AudioSession::with_backend(FakeBackend::new()));
        session.open().unwrap();

        let (done_tx, done_rx) = mpsc::channel();
        let weak = Arc::downgrade(&session);
        session
            .subscribe(move |_| {
                if let Some(session) = weak.upgrade() {
                    session.close();
                    let _ = done_tx.send(session.state());
                }
            })
            .unwrap();

        session.backend.set_volume(FakeBackend::DEFAULT_SINK, 10.0).unwrap();
        let state = done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(state, SessionState::Closed);
    }

    #[test]
    fn panicking_callback_does_not_stop_notifications() {
        let backend = Arc::new(FakeBackend::new());
        let session = AudioSession::with_shared_backend(backend.clone());
        session.open().unwrap();

        let (panicked_tx, panicked_rx) = mpsc::channel();
        session
            .subscribe(move |_| {
                let _ = panicked_tx.send(());
                panic!("callback failure");
            })
            .unwrap();
        backend.emit_change();
        panicked_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        let (tx, rx) = mpsc::channel();
        session
            .subscribe(move |event| {
                let _ = tx.send(event);
            })
            .unwrap();
        backend.emit_change();

        assert!(rx.recv_timeout(Duration::from_secs(2)).unwrap().is_sentinel());
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn state_is_observable_while_connecting() {
        let backend = Arc::new(FakeBackend::new());
        backend.stall_connections(true);
        let session = Arc::new(AudioSession::with_shared_backend(backend.clone()));

        let opener = {
            let session = session.clone();
            thread::spawn(move || session.open())
        };
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while backend.connect_count() == 0 {
            assert!(std::time::Instant::now() < deadline, "connect never started");
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(session.state(), SessionState::Connecting);
        assert_eq!(session.open(), Err(AudioError::NotReady));

        backend.stall_connections(false);
        assert_eq!(opener.join().unwrap(), Ok(()));
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn close_while_connecting_cancels_open() {
        let backend = Arc::new(FakeBackend::new());
        backend.stall_connections(true);
        let session = Arc::new(AudioSession::with_shared_backend(backend.clone()));

        let opener = {
            let session = session.clone();
            thread::spawn(move || session.open())
        };
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while backend.connect_count() == 0 {
            assert!(std::time::Instant::now() < deadline, "connect never started");
            thread::sleep(Duration::from_millis(5));
        }

        session.close();
        backend.stall_connections(false);

        assert_eq!(opener.join().unwrap(), Err(AudioError::Cancelled));
        assert_eq!(session.state(), SessionState::Closed);
        assert!(!backend.is_connected());
    }
}
