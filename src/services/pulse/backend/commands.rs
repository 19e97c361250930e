use std::sync::Arc;

use libpulse_binding::callbacks::ListResult;
use tracing::debug;

use crate::services::pulse::{AudioError, SinkSnapshot};

use super::{
    conversion::{snapshot_from_sink, stereo_volumes},
    types::{PulseCommand, Reply},
    worker::{Worker, failure, refused},
};

/// One step of a by-name introspection listing
#[derive(Debug)]
pub(super) enum ListStep<T> {
    Item(T),
    End,
    Error,
}

/// Settles a sink lookup from the steps of its listing
///
/// An item followed by the end of the list is a hit, the end with nothing
/// before it is `SinkNotFound`. An error after an item still counts as a hit;
/// an error with no item is classified by `on_error`.
#[derive(Debug)]
pub(super) struct SinkLookup {
    sink: String,
    found: Option<SinkSnapshot>,
    settled: bool,
}

impl SinkLookup {
    pub(super) fn new(sink: &str) -> Self {
        Self {
            sink: sink.to_string(),
            found: None,
            settled: false,
        }
    }

    /// Feed one step; returns the outcome once, when the lookup settles
    pub(super) fn step(
        &mut self,
        step: ListStep<SinkSnapshot>,
        on_error: impl FnOnce(&str) -> AudioError,
    ) -> Option<Result<SinkSnapshot, AudioError>> {
        if self.settled {
            return None;
        }

        let outcome = match step {
            ListStep::Item(snapshot) => {
                self.found = Some(snapshot);
                return None;
            }
            ListStep::End => self
                .found
                .take()
                .ok_or_else(|| AudioError::SinkNotFound(self.sink.clone())),
            ListStep::Error => match self.found.take() {
                Some(snapshot) => Ok(snapshot),
                None => Err(on_error(&self.sink)),
            },
        };

        self.settled = true;
        Some(outcome)
    }
}

impl Worker {
    /// Issue one request; the reply is delivered from a libpulse callback
    pub(super) fn handle(&mut self, command: PulseCommand) {
        match command {
            PulseCommand::DefaultSink { reply } => self.default_sink(reply),
            PulseCommand::SinkInfo { sink, reply } => self.sink_info(sink, reply),
            PulseCommand::SetVolume {
                sink,
                percent,
                reply,
            } => self.set_volume(sink, percent, reply),
            PulseCommand::SetMute { sink, muted, reply } => self.set_mute(sink, muted, reply),
            PulseCommand::Subscribe { reply } => self.subscribe(reply),
            PulseCommand::Shutdown => {}
        }
    }

    fn default_sink(&mut self, reply: Reply<String>) {
        debug!("Requesting server info");
        let slot = self.pending.track(reply);

        self.locked(|context| {
            if let Some(error) = refused(context) {
                slot.complete(Err(error));
                return;
            }

            context.introspect().get_server_info(move |server_info| {
                let name = server_info
                    .default_sink_name
                    .as_ref()
                    .map(|name| name.to_string())
                    .unwrap_or_default();
                slot.complete(Ok(name));
            });
        });
    }

    fn sink_info(&mut self, sink: String, reply: Reply<SinkSnapshot>) {
        debug!(%sink, "Requesting sink info");
        let slot = self.pending.track(reply);
        let weak_context = Arc::downgrade(&self.context);

        self.locked(|context| {
            if let Some(error) = refused(context) {
                slot.complete(Err(error));
                return;
            }

            let mut lookup = SinkLookup::new(&sink);
            context
                .introspect()
                .get_sink_info_by_name(&sink, move |result| {
                    let step = match result {
                        ListResult::Item(sink_info) => ListStep::Item(snapshot_from_sink(sink_info)),
                        ListResult::End => ListStep::End,
                        ListResult::Error => ListStep::Error,
                    };
                    if let Some(settled) = lookup.step(step, |name| failure(&weak_context, name)) {
                        slot.complete(settled);
                    }
                });
        });
    }

    fn set_volume(&mut self, sink: String, percent: f64, reply: Reply<()>) {
        debug!(%sink, percent, "Setting sink volume");
        let slot = self.pending.track(reply);
        let weak_context = Arc::downgrade(&self.context);
        let volumes = stereo_volumes(percent);

        self.locked(|context| {
            if let Some(error) = refused(context) {
                slot.complete(Err(error));
                return;
            }

            let name = sink.clone();
            context.introspect().set_sink_volume_by_name(
                &sink,
                &volumes,
                Some(Box::new(move |success| {
                    if success {
                        slot.complete(Ok(()));
                    } else {
                        slot.complete(Err(failure(&weak_context, &name)));
                    }
                })),
            );
        });
    }

    fn set_mute(&mut self, sink: String, muted: bool, reply: Reply<()>) {
        debug!(%sink, muted, "Setting sink mute");
        let slot = self.pending.track(reply);
        let weak_context = Arc::downgrade(&self.context);

        self.locked(|context| {
            if let Some(error) = refused(context) {
                slot.complete(Err(error));
                return;
            }

            let name = sink.clone();
            context.introspect().set_sink_mute_by_name(
                &sink,
                muted,
                Some(Box::new(move |success| {
                    if success {
                        slot.complete(Ok(()));
                    } else {
                        slot.complete(Err(failure(&weak_context, &name)));
                    }
                })),
            );
        });
    }
}
