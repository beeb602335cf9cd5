//! Post-commit handoff of an aggregate's pending events to the bus.
//!
//! The aggregate never publishes anything itself. After the host has durably
//! committed the aggregate's new state it calls [`EventDispatcher::dispatch`],
//! which publishes every pending event in order and only then clears the
//! aggregate's buffer.

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use doorx_core::AggregateRoot;

use crate::{Event, EventBus, EventEnvelope};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventDispatchError {
    /// The bus rejected an event. Pending events were left on the aggregate.
    #[error("failed to publish event {event_id}: {reason}")]
    Publish { event_id: Uuid, reason: String },
}

/// Forwards pending domain events of committed aggregates to an [`EventBus`].
#[derive(Debug)]
pub struct EventDispatcher<B> {
    bus: B,
}

impl<B> EventDispatcher<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Publish all pending events of `aggregate`, then clear its buffer.
    ///
    /// Returns the number of events published. On a publish failure the buffer
    /// is left untouched so the whole batch can be retried; events published
    /// before the failure will then be delivered again (at-least-once).
    pub fn dispatch<A>(&self, aggregate: &mut A) -> Result<usize, EventDispatchError>
    where
        A: AggregateRoot,
        A::Id: Copy + Into<Uuid>,
        A::Event: Event,
        B: EventBus<EventEnvelope<A::Event>>,
    {
        let aggregate_id: Uuid = (*aggregate.id()).into();
        let aggregate_type = A::aggregate_type();

        for (idx, event) in aggregate.domain_events().iter().enumerate() {
            let envelope =
                EventEnvelope::from_domain_event(aggregate_id, aggregate_type, idx as u64 + 1, event);

            debug!(
                aggregate_type,
                aggregate_id = %aggregate_id,
                event_type = envelope.event_type(),
                event_id = %envelope.event_id(),
                "dispatching domain event"
            );

            if let Err(e) = self.bus.publish(envelope) {
                warn!(
                    aggregate_type,
                    aggregate_id = %aggregate_id,
                    event_id = %event.event_id(),
                    error = ?e,
                    "event publication failed; pending events left on aggregate"
                );
                return Err(EventDispatchError::Publish {
                    event_id: event.event_id(),
                    reason: format!("{e:?}"),
                });
            }
        }

        let published = aggregate.domain_events().len();
        aggregate.clear_domain_events();
        Ok(published)
    }
}
