/// Request handlers run on the session worker
mod commands;
/// Volume and sink conversion utilities
pub mod conversion;
/// Change subscription
pub mod events;
/// Type definitions and aliases
pub mod types;
mod worker;

pub use types::{ChangeSender, ConnectionSettings, PulseCommand, Reply};

use std::{
    sync::{Mutex, MutexGuard, PoisonError, mpsc},
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, warn};

use super::{AudioError, SinkSnapshot};

/// Library seam behind an [`AudioSession`](super::AudioSession)
///
/// Every call blocks the caller until the server acknowledges it. The session
/// owns the state machine and only calls into the backend once connected, so
/// implementations can assume `connect` succeeded before any query.
pub trait AudioBackend: Send + Sync + 'static {
    /// Connect and block until the server is ready
    ///
    /// Change notifications go to `events` once [`subscribe`](Self::subscribe)
    /// succeeds. The backend drops every clone of `events` on disconnect.
    ///
    /// # Errors
    /// `AllocFailed`, `ConnectFailed`, or `Timeout`
    fn connect(&self, events: ChangeSender) -> Result<(), AudioError>;

    /// Release the connection; callers still waiting get `Cancelled`
    fn disconnect(&self);

    /// Name of the server's default sink, empty if there is none
    ///
    /// # Errors
    /// `RequestFailed`, `Timeout`, or `Cancelled`
    fn default_sink(&self) -> Result<String, AudioError>;

    /// Volume and mute state of one sink
    ///
    /// # Errors
    /// `SinkNotFound` if no such sink exists, otherwise as for queries
    fn sink_info(&self, sink: &str) -> Result<SinkSnapshot, AudioError>;

    /// Apply `percent` of normal volume to every channel of `sink`
    ///
    /// # Errors
    /// `SinkNotFound` if no such sink exists, otherwise as for queries
    fn set_volume(&self, sink: &str, percent: f64) -> Result<(), AudioError>;

    /// Mute or unmute `sink`
    ///
    /// # Errors
    /// `SinkNotFound` if no such sink exists, otherwise as for queries
    fn set_mute(&self, sink: &str, muted: bool) -> Result<(), AudioError>;

    /// Start delivering sink and server change notifications
    ///
    /// # Errors
    /// `RequestFailed`, `Timeout`, or `Cancelled`
    fn subscribe(&self) -> Result<(), AudioError>;
}

/// Block on a one-shot reply
///
/// A reply channel whose sender vanished means the worker went away with
/// the request still pending.
///
/// # Errors
/// The request's own error, `Timeout` if `timeout` elapses, `Cancelled` if
/// the reply can never arrive.
pub fn wait_for_reply<T>(
    reply: &mpsc::Receiver<Result<T, AudioError>>,
    timeout: Option<Duration>,
) -> Result<T, AudioError> {
    match timeout {
        Some(timeout) => reply.recv_timeout(timeout).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => AudioError::Timeout(timeout),
            mpsc::RecvTimeoutError::Disconnected => AudioError::Cancelled,
        })?,
        None => reply.recv().map_err(|_| AudioError::Cancelled)?,
    }
}

struct WorkerHandle {
    commands: mpsc::Sender<PulseCommand>,
    thread: JoinHandle<()>,
}

/// PulseAudio backend over libpulse's threaded mainloop
///
/// A dedicated thread owns the mainloop and context and issues requests
/// under the mainloop lock; completion callbacks hand results straight back
/// to the blocked caller.
pub struct PulseBackend {
    settings: ConnectionSettings,
    worker: Mutex<Option<WorkerHandle>>,
}

impl PulseBackend {
    /// Create an unconnected backend
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            settings,
            worker: Mutex::new(None),
        }
    }

    fn worker(&self) -> MutexGuard<'_, Option<WorkerHandle>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> PulseCommand,
    ) -> Result<T, AudioError> {
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        {
            let worker = self.worker();
            let worker = worker.as_ref().ok_or(AudioError::NotReady)?;
            worker.commands.send(build(reply_tx)).map_err(|_| {
                AudioError::RequestFailed("PulseAudio worker has stopped".to_string())
            })?;
        }

        wait_for_reply(&reply_rx, self.settings.timeout)
    }
}

impl AudioBackend for PulseBackend {
    fn connect(&self, events: ChangeSender) -> Result<(), AudioError> {
        let mut worker = self.worker();
        if worker.is_some() {
            return Ok(());
        }

        let (command_tx, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let settings = self.settings.clone();

        let thread = thread::Builder::new()
            .name("pulse-session".to_string())
            .spawn(move || worker::run_worker(settings, events, command_rx, ready_tx))
            .map_err(|e| AudioError::AllocFailed(format!("failed to spawn worker: {e}")))?;

        // The worker enforces the connect timeout itself and always answers.
        let ready = wait_for_reply(&ready_rx, None).map_err(|e| match e {
            AudioError::Cancelled => {
                AudioError::ConnectFailed("worker exited before connecting".to_string())
            }
            e => e,
        });
        if let Err(error) = ready {
            if thread.join().is_err() {
                warn!("PulseAudio worker panicked during connect");
            }
            return Err(error);
        }

        *worker = Some(WorkerHandle {
            commands: command_tx,
            thread,
        });
        Ok(())
    }

    fn disconnect(&self) {
        let Some(handle) = self.worker().take() else {
            return;
        };

        let _ = handle.commands.send(PulseCommand::Shutdown);
        if handle.thread.join().is_err() {
            warn!("PulseAudio worker panicked");
        }
        debug!("PulseAudio worker joined");
    }

    fn default_sink(&self) -> Result<String, AudioError> {
        self.request(|reply| PulseCommand::DefaultSink { reply })
    }

    fn sink_info(&self, sink: &str) -> Result<SinkSnapshot, AudioError> {
        self.request(|reply| PulseCommand::SinkInfo {
            sink: sink.to_string(),
            reply,
        })
    }

    fn set_volume(&self, sink: &str, percent: f64) -> Result<(), AudioError> {
        self.request(|reply| PulseCommand::SetVolume {
            sink: sink.to_string(),
            percent,
            reply,
        })
    }

    fn set_mute(&self, sink: &str, muted: bool) -> Result<(), AudioError> {
        self.request(|reply| PulseCommand::SetMute {
            sink: sink.to_string(),
            muted,
            reply,
        })
    }

    fn subscribe(&self) -> Result<(), AudioError> {
        self.request(|reply| PulseCommand::Subscribe { reply })
    }
}

impl Drop for PulseBackend {
    fn drop(&mut self) {
        self.disconnect();
    }
}
