//! Aggregate roots: audit timestamps plus the pending domain event ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;

/// An immutable record of something that already happened inside an aggregate.
///
/// The payload is a small typed value (ids and values relevant to the fact);
/// it never holds a live reference to the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent<P> {
    event_id: Uuid,
    occurred_at: DateTime<Utc>,
    payload: P,
}

impl<P> DomainEvent<P> {
    /// Wrap a payload with a fresh event id and the current time.
    pub fn new(payload: P) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            occurred_at: Utc::now(),
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}

/// State every aggregate root carries: creation/modification times and the
/// ordered, append-only buffer of pending domain events.
///
/// Aggregates keep this as a private field. Only the aggregate's own
/// operations can reach [`AggregateState::record`] and
/// [`AggregateState::touch`]; everyone else sees the read-only view exposed
/// through [`AggregateRoot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateState<P> {
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
    events: Vec<DomainEvent<P>>,
}

impl<P> AggregateState<P> {
    /// Fresh state stamped with the current time.
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            modified_at: None,
            events: Vec::new(),
        }
    }

    /// Rebuild state from persisted audit columns. Starts with no pending events.
    pub fn rehydrate(created_at: DateTime<Utc>, modified_at: Option<DateTime<Utc>>) -> Self {
        Self {
            created_at,
            modified_at,
            events: Vec::new(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    /// Append a domain event to the pending buffer.
    pub fn record(&mut self, payload: P) {
        self.events.push(DomainEvent::new(payload));
    }

    /// Mark the aggregate as modified now.
    pub fn touch(&mut self) {
        self.modified_at = Some(Utc::now());
    }

    pub fn events(&self) -> &[DomainEvent<P>] {
        &self.events
    }

    /// Empty the pending buffer. Idempotent.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<P> Default for AggregateState<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate root: the single entry point for mutating a cluster of objects.
///
/// Publishing is not part of this trait. A host reads [`domain_events`]
/// after its transaction commits, forwards them to a dispatcher, then calls
/// [`clear_domain_events`].
///
/// [`domain_events`]: AggregateRoot::domain_events
/// [`clear_domain_events`]: AggregateRoot::clear_domain_events
pub trait AggregateRoot: Entity {
    /// Closed set of event payloads this aggregate emits.
    type Event: Clone + core::fmt::Debug;

    /// Stable aggregate type name (e.g. "work_orders.order").
    fn aggregate_type() -> &'static str;

    fn created_at(&self) -> DateTime<Utc>;

    fn modified_at(&self) -> Option<DateTime<Utc>>;

    /// Pending events, oldest first.
    fn domain_events(&self) -> &[DomainEvent<Self::Event>];

    /// Drop all pending events. Safe to call any number of times.
    fn clear_domain_events(&mut self);
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for idempotent commands, migrations, etc.).
    Any,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum LedgerEvent {
        Opened,
        Renamed(String),
    }

    #[derive(Debug)]
    struct Ledger {
        id: u8,
        name: String,
        state: AggregateState<LedgerEvent>,
    }

    impl Ledger {
        fn open(id: u8) -> Self {
            let mut ledger = Self {
                id,
                name: String::new(),
                state: AggregateState::new(),
            };
            ledger.state.record(LedgerEvent::Opened);
            ledger
        }

        fn rename(&mut self, name: &str) {
            self.name = name.to_string();
            self.state.touch();
            self.state.record(LedgerEvent::Renamed(name.to_string()));
        }
    }

    impl Entity for Ledger {
        type Id = u8;

        fn id(&self) -> &u8 {
            &self.id
        }
    }

    impl AggregateRoot for Ledger {
        type Event = LedgerEvent;

        fn aggregate_type() -> &'static str {
            "tests.ledger"
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.state.created_at()
        }

        fn modified_at(&self) -> Option<DateTime<Utc>> {
            self.state.modified_at()
        }

        fn domain_events(&self) -> &[DomainEvent<LedgerEvent>] {
            self.state.events()
        }

        fn clear_domain_events(&mut self) {
            self.state.clear();
        }
    }

    #[test]
    fn events_are_kept_in_recording_order() {
        let mut ledger = Ledger::open(1);
        ledger.rename("north wing");

        let payloads: Vec<_> = ledger.domain_events().iter().map(|e| e.payload().clone()).collect();
        assert_eq!(
            payloads,
            vec![LedgerEvent::Opened, LedgerEvent::Renamed("north wing".into())]
        );
        assert_ne!(
            ledger.domain_events()[0].event_id(),
            ledger.domain_events()[1].event_id()
        );
    }

    #[test]
    fn clear_is_idempotent() {
        let mut ledger = Ledger::open(2);
        ledger.clear_domain_events();
        ledger.clear_domain_events();
        assert!(ledger.domain_events().is_empty());
    }

    #[test]
    fn touch_sets_modified_at() {
        let mut ledger = Ledger::open(3);
        assert!(ledger.modified_at().is_none());
        ledger.rename("south wing");
        let modified = ledger.modified_at().unwrap();
        assert!(modified >= ledger.created_at());
    }

    #[test]
    fn rehydrated_state_has_no_pending_events() {
        let created = Utc::now();
        let state: AggregateState<LedgerEvent> = AggregateState::rehydrate(created, None);
        assert_eq!(state.created_at(), created);
        assert!(state.events().is_empty());
    }

    #[test]
    fn expected_version_matching() {
        assert!(ExpectedVersion::Any.matches(42));
        assert!(ExpectedVersion::Exact(3).matches(3));
        assert!(!ExpectedVersion::Exact(3).matches(4));
    }
}
