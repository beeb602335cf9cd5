use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doorx_core::DomainEvent;

/// Envelope for a published event, containing stream metadata.
///
/// This is the unit handed to the bus after the aggregate was committed.
///
/// Notes:
/// - `event_id` and `occurred_at` are copied from the aggregate's pending event,
///   so republishing the same pending event yields the same `event_id`.
/// - `sequence_number` is the 1-based position of the event within the batch
///   dispatched for one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    aggregate_id: Uuid,
    aggregate_type: String,
    event_type: String,
    event_version: u32,
    sequence_number: u64,
    occurred_at: DateTime<Utc>,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        aggregate_id: Uuid,
        aggregate_type: impl Into<String>,
        event_type: impl Into<String>,
        event_version: u32,
        sequence_number: u64,
        occurred_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            event_type: event_type.into(),
            event_version,
            sequence_number,
            occurred_at,
            payload,
        }
    }

    /// Wrap a pending domain event for publication.
    pub fn from_domain_event(
        aggregate_id: Uuid,
        aggregate_type: &str,
        sequence_number: u64,
        event: &DomainEvent<E>,
    ) -> Self
    where
        E: crate::Event,
    {
        let payload = event.payload().clone();
        Self::new(
            event.event_id(),
            aggregate_id,
            aggregate_type,
            payload.event_type(),
            payload.version(),
            sequence_number,
            event.occurred_at(),
            payload,
        )
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> u32 {
        self.event_version
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
