use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak, mpsc},
    time::Instant,
};

use libpulse_binding::{
    context::{Context, FlagSet as ContextFlags, State as ContextState},
    error::{Code, PAErr},
    mainloop::threaded::Mainloop,
    proplist::{Proplist, properties},
};
use tracing::{debug, info, warn};

use crate::services::pulse::AudioError;

use super::types::{ChangeSender, ConnectionSettings, PendingReplies, PulseCommand, Reply};

/// Context shared with libpulse callbacks
///
/// Callbacks run on libpulse's event thread with the mainloop lock held, and
/// the worker only touches the context while holding that same lock, so the
/// mutex is never contended.
pub(super) type SharedContext = Arc<Mutex<Context>>;

pub(super) fn lock_context(context: &SharedContext) -> MutexGuard<'_, Context> {
    context.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owner of the threaded mainloop and context for one session
///
/// The context is declared first so it is released before the mainloop.
pub(super) struct Worker {
    pub(super) context: SharedContext,
    mainloop: Mainloop,
    pub(super) pending: PendingReplies,
    pub(super) events: ChangeSender,
    running: bool,
}

impl Worker {
    /// Create the mainloop and context, connect, and wait for `Ready`
    ///
    /// Re-checks the context state every time the state callback fires.
    ///
    /// # Errors
    /// `AllocFailed` if the mainloop, proplist, or context cannot be created,
    /// `ConnectFailed` if the context leaves the good states, `Timeout` if the
    /// configured timeout elapses first.
    pub(super) fn connect(
        settings: &ConnectionSettings,
        events: ChangeSender,
    ) -> Result<Self, AudioError> {
        let mainloop = Mainloop::new()
            .ok_or_else(|| AudioError::AllocFailed("failed to create mainloop".to_string()))?;

        let mut proplist = Proplist::new()
            .ok_or_else(|| AudioError::AllocFailed("failed to create proplist".to_string()))?;
        if proplist
            .set_str(properties::APPLICATION_NAME, &settings.client_name)
            .is_err()
        {
            warn!(client = %settings.client_name, "Could not set application name property");
        }

        let context = Context::new_with_proplist(&mainloop, &settings.client_name, &proplist)
            .ok_or_else(|| AudioError::AllocFailed("failed to create context".to_string()))?;

        #[allow(clippy::arc_with_non_send_sync)]
        let mut worker = Worker {
            context: Arc::new(Mutex::new(context)),
            mainloop,
            pending: PendingReplies::default(),
            events,
            running: false,
        };

        let (state_tx, state_rx) = mpsc::channel::<()>();
        {
            let mut context = lock_context(&worker.context);
            context.set_state_callback(Some(Box::new(move || {
                let _ = state_tx.send(());
            })));
            context
                .connect(settings.server.as_deref(), ContextFlags::NOFLAGS, None)
                .map_err(|e| AudioError::ConnectFailed(format!("connect refused: {e}")))?;
        }

        worker
            .mainloop
            .start()
            .map_err(|e| AudioError::AllocFailed(format!("failed to start mainloop: {e}")))?;
        worker.running = true;

        let deadline = settings.timeout.map(|timeout| (Instant::now() + timeout, timeout));
        loop {
            let state = worker.locked(|context| context.get_state());
            debug!(?state, "PulseAudio context state");

            match state {
                ContextState::Ready => break,
                state if !state.is_good() => {
                    let errno = worker.locked(|context| context.errno());
                    return Err(AudioError::ConnectFailed(format!(
                        "context entered {state:?}: {errno}"
                    )));
                }
                _ => {}
            }

            match deadline {
                Some((deadline, timeout)) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(AudioError::Timeout(timeout));
                    }
                    if let Err(mpsc::RecvTimeoutError::Disconnected) =
                        state_rx.recv_timeout(remaining)
                    {
                        return Err(AudioError::ConnectFailed(
                            "state observer dropped".to_string(),
                        ));
                    }
                }
                None => {
                    if state_rx.recv().is_err() {
                        return Err(AudioError::ConnectFailed(
                            "state observer dropped".to_string(),
                        ));
                    }
                }
            }
        }

        info!(client = %settings.client_name, "Connected to PulseAudio");
        Ok(worker)
    }

    /// Process requests until shutdown or until every sender is gone
    pub(super) fn run(mut self, commands: mpsc::Receiver<PulseCommand>) {
        while let Ok(command) = commands.recv() {
            match command {
                PulseCommand::Shutdown => {
                    debug!("PulseAudio worker received shutdown");
                    break;
                }
                command => self.handle(command),
            }
        }

        self.shutdown();
    }

    /// Run `f` on the context with the mainloop lock held
    pub(super) fn locked<R>(&mut self, f: impl FnOnce(&mut Context) -> R) -> R {
        self.mainloop.lock();
        let result = f(&mut lock_context(&self.context));
        self.mainloop.unlock();
        result
    }

    /// Disconnect, stop the event thread, and cancel unanswered requests
    pub(super) fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;

        self.locked(|context| {
            context.set_subscribe_callback(None);
            context.set_state_callback(None);
            context.disconnect();
        });
        self.mainloop.stop();

        let cancelled = self.pending.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "Cancelled in-flight PulseAudio requests");
        }
        info!("Disconnected from PulseAudio");
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Refusal issued without reaching the server
pub(super) fn refused(context: &Context) -> Option<AudioError> {
    match context.get_state() {
        ContextState::Ready => None,
        state => Some(AudioError::RequestFailed(format!(
            "context is {state:?}, not ready"
        ))),
    }
}

/// Classify a failed request from the context's last error
///
/// Callbacks hold the context weakly; a context that is already gone means
/// the session is shutting down.
pub(super) fn failure(context: &Weak<Mutex<Context>>, sink: &str) -> AudioError {
    let Some(context) = context.upgrade() else {
        return AudioError::Cancelled;
    };
    let errno = lock_context(&context).errno();

    if errno == PAErr::from(Code::NoEntity) {
        AudioError::SinkNotFound(sink.to_string())
    } else {
        AudioError::RequestFailed(format!("{errno}"))
    }
}

/// Worker entry point: connect, report readiness, then serve requests
pub(super) fn run_worker(
    settings: ConnectionSettings,
    events: ChangeSender,
    commands: mpsc::Receiver<PulseCommand>,
    ready: Reply<()>,
) {
    match Worker::connect(&settings, events) {
        Ok(worker) => {
            let _ = ready.send(Ok(()));
            worker.run(commands);
        }
        Err(error) => {
            warn!(%error, "PulseAudio connection failed");
            let _ = ready.send(Err(error));
        }
    }
}
