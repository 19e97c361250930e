//! In-memory audio server for exercising sessions without PulseAudio

use std::{
    collections::BTreeMap,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
};

use tracing::debug;

use super::{
    AudioError, ChangeEvent, SinkSnapshot,
    backend::{
        AudioBackend, ChangeSender,
        conversion::{APPLIED_CHANNELS, average_percent, percent_to_volume},
    },
};

#[derive(Debug, Clone)]
struct FakeSink {
    channels: Vec<u32>,
    muted: bool,
}

#[derive(Default)]
struct FakeServer {
    sinks: BTreeMap<String, FakeSink>,
    default_sink: String,
    events: Option<ChangeSender>,
    connected: bool,
    subscribed: bool,
    refuse_connections: bool,
    fail_subscriptions: bool,
    stall_requests: bool,
    stall_connections: bool,
    connect_count: usize,
    request_count: usize,
}

impl FakeServer {
    fn notify(&self) {
        if !self.subscribed {
            return;
        }
        if let Some(events) = &self.events {
            let _ = events.send(ChangeEvent::sentinel());
        }
    }

    fn sink_mut(&mut self, name: &str) -> Result<&mut FakeSink, AudioError> {
        self.sinks
            .get_mut(name)
            .ok_or_else(|| AudioError::SinkNotFound(name.to_string()))
    }
}

/// Backend that keeps sinks in memory
///
/// Volumes are stored as raw per-channel values and pass through the same
/// conversion as [`PulseBackend`](super::PulseBackend), so percent rounding
/// matches the real server. Mutations notify subscribers the way the server
/// does.
pub struct FakeBackend {
    server: Mutex<FakeServer>,
    released: Condvar,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    /// Name of the stereo sink every new fake server starts with
    pub const DEFAULT_SINK: &'static str = "alsa_output.pci-0000_00_1f.3.analog-stereo";

    /// Server with [`DEFAULT_SINK`](Self::DEFAULT_SINK) at 50%, unmuted
    pub fn new() -> Self {
        let backend = Self::empty();
        backend.add_sink(Self::DEFAULT_SINK, &[32768, 32768], false);
        backend.set_default_sink(Self::DEFAULT_SINK);
        backend
    }

    /// Server with no sinks and no default sink
    pub fn empty() -> Self {
        Self {
            server: Mutex::new(FakeServer::default()),
            released: Condvar::new(),
        }
    }

    /// Add or replace a sink with raw channel volumes
    pub fn add_sink(&self, name: &str, channels: &[u32], muted: bool) {
        let mut server = self.server();
        server.sinks.insert(
            name.to_string(),
            FakeSink {
                channels: channels.to_vec(),
                muted,
            },
        );
        server.notify();
    }

    /// Remove a sink; the default sink name is left untouched
    pub fn remove_sink(&self, name: &str) {
        let mut server = self.server();
        if server.sinks.remove(name).is_some() {
            server.notify();
        }
    }

    /// Change the server's default sink; empty means none
    pub fn set_default_sink(&self, name: &str) {
        let mut server = self.server();
        server.default_sink = name.to_string();
        server.notify();
    }

    /// Raw per-channel volumes of `name`
    pub fn raw_volumes(&self, name: &str) -> Option<Vec<u32>> {
        self.server()
            .sinks
            .get(name)
            .map(|sink| sink.channels.clone())
    }

    /// Deliver one change notification if a subscription is active
    pub fn emit_change(&self) {
        self.server().notify();
    }

    /// Make the next connection attempts fail
    pub fn refuse_connections(&self, refuse: bool) {
        self.server().refuse_connections = refuse;
    }

    /// Make the server reject subscriptions
    pub fn fail_subscriptions(&self, fail: bool) {
        self.server().fail_subscriptions = fail;
    }

    /// Hold requests unanswered until released or disconnected
    pub fn stall_requests(&self, stall: bool) {
        self.server().stall_requests = stall;
        self.released.notify_all();
    }

    /// Hold connection attempts until released
    pub fn stall_connections(&self, stall: bool) {
        self.server().stall_connections = stall;
        self.released.notify_all();
    }

    /// Connection attempts so far, successful or not
    pub fn connect_count(&self) -> usize {
        self.server().connect_count
    }

    /// Requests that reached the server
    pub fn request_count(&self) -> usize {
        self.server().request_count
    }

    /// Whether a connection is open
    pub fn is_connected(&self) -> bool {
        self.server().connected
    }

    fn server(&self) -> MutexGuard<'_, FakeServer> {
        self.server.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter a request, waiting out any stall
    fn request(&self) -> Result<MutexGuard<'_, FakeServer>, AudioError> {
        let mut server = self.server();
        if !server.connected {
            return Err(AudioError::NotReady);
        }
        server.request_count += 1;

        while server.stall_requests && server.connected {
            server = self
                .released
                .wait(server)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if !server.connected {
            return Err(AudioError::Cancelled);
        }
        Ok(server)
    }
}

impl AudioBackend for FakeBackend {
    fn connect(&self, events: ChangeSender) -> Result<(), AudioError> {
        let mut server = self.server();
        server.connect_count += 1;
        while server.stall_connections {
            server = self
                .released
                .wait(server)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if server.refuse_connections {
            return Err(AudioError::ConnectFailed("connection refused".to_string()));
        }

        server.events = Some(events);
        server.connected = true;
        debug!("Fake audio server connected");
        Ok(())
    }

    fn disconnect(&self) {
        let mut server = self.server();
        server.connected = false;
        server.subscribed = false;
        server.events = None;
        drop(server);
        self.released.notify_all();
    }

    fn default_sink(&self) -> Result<String, AudioError> {
        Ok(self.request()?.default_sink.clone())
    }

    fn sink_info(&self, sink: &str) -> Result<SinkSnapshot, AudioError> {
        let mut server = self.request()?;
        let state = server.sink_mut(sink)?;
        Ok(SinkSnapshot {
            name: sink.to_string(),
            volume: average_percent(&state.channels),
            muted: state.muted,
        })
    }

    fn set_volume(&self, sink: &str, percent: f64) -> Result<(), AudioError> {
        let mut server = self.request()?;
        let raw = percent_to_volume(percent).0;
        server.sink_mut(sink)?.channels = vec![raw; usize::from(APPLIED_CHANNELS)];
        server.notify();
        Ok(())
    }

    fn set_mute(&self, sink: &str, muted: bool) -> Result<(), AudioError> {
        let mut server = self.request()?;
        server.sink_mut(sink)?.muted = muted;
        server.notify();
        Ok(())
    }

    fn subscribe(&self) -> Result<(), AudioError> {
        let mut server = self.request()?;
        if server.fail_subscriptions {
            return Err(AudioError::RequestFailed(
                "server rejected subscription".to_string(),
            ));
        }
        server.subscribed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::mpsc;

    use super::*;

    #[test]
    fn changes_are_silent_until_subscribed() {
        let backend = FakeBackend::new();
        let (tx, rx) = mpsc::channel();
        backend.connect(tx).unwrap();

        backend.emit_change();
        assert!(rx.try_recv().is_err());

        backend.subscribe().unwrap();
        backend.emit_change();
        assert!(rx.try_recv().unwrap().is_sentinel());
    }

    #[test]
    fn set_volume_writes_two_channels() {
        let backend = FakeBackend::empty();
        backend.add_sink("surround", &[65536; 6], false);
        let (tx, _rx) = mpsc::channel();
        backend.connect(tx).unwrap();

        backend.set_volume("surround", 25.0).unwrap();
        assert_eq!(backend.raw_volumes("surround"), Some(vec![16384, 16384]));
    }

    #[test]
    fn disconnect_drops_the_event_sender() {
        let backend = FakeBackend::new();
        let (tx, rx) = mpsc::channel();
        backend.connect(tx).unwrap();
        backend.disconnect();

        assert!(rx.recv().is_err());
        assert_eq!(backend.default_sink(), Err(AudioError::NotReady));
    }
}
