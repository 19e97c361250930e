use libpulse_binding::context::subscribe::{Facility, InterestMaskSet, Operation};
use tracing::{debug, trace};

use crate::services::pulse::{AudioError, ChangeEvent};

use super::{
    types::{ChangeSender, Reply},
    worker::{Worker, refused},
};

type SubscriptionCallback = Option<Box<dyn FnMut(Option<Facility>, Option<Operation>, u32)>>;

/// Facilities whose events reach the host
///
/// Sink add/remove/property changes and server-level changes such as a new
/// default sink.
pub fn is_relevant(facility: Option<Facility>) -> bool {
    matches!(facility, Some(Facility::Sink | Facility::Server))
}

fn forward_changes(events: ChangeSender) -> SubscriptionCallback {
    Some(Box::new(move |facility, operation, index| {
        if !is_relevant(facility) {
            return;
        }
        trace!(?facility, ?operation, index, "PulseAudio change");
        let _ = events.send(ChangeEvent::sentinel());
    }))
}

impl Worker {
    /// Install the change forwarder and ask the server for sink and server
    /// events
    ///
    /// Replaces any earlier forwarder, so at most one is ever active.
    pub(super) fn subscribe(&mut self, reply: Reply<()>) {
        debug!("Subscribing to sink and server events");
        let slot = self.pending.track(reply);
        let callback = forward_changes(self.events.clone());

        self.locked(|context| {
            if let Some(error) = refused(context) {
                slot.complete(Err(error));
                return;
            }

            context.set_subscribe_callback(callback);
            context.subscribe(
                InterestMaskSet::SINK | InterestMaskSet::SERVER,
                move |success| {
                    if success {
                        slot.complete(Ok(()));
                    } else {
                        slot.complete(Err(AudioError::RequestFailed(
                            "server rejected subscription".to_string(),
                        )));
                    }
                },
            );
        });
    }
}
