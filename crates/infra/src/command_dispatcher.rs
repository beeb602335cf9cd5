//! Command execution pipeline (application-level orchestration).
//!
//! The `CommandDispatcher` runs every state change on an aggregate through the
//! same steps:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the aggregate through a fresh session (optimistic version recorded)
//!   ↓
//! 2. Run the domain operation (pure, returns DomainResult)
//!   ↓
//! 3. Stage + commit the new state (optimistic concurrency check)
//!   ↓
//! 4. Dispatch pending domain events to the bus, then clear them
//! ```
//!
//! A failing domain operation aborts before anything is staged, so a rejected
//! command never reaches the store or the bus. Events are only published after
//! the commit succeeded. If publication then fails, the committed aggregate is
//! handed back inside [`DispatchError::Publish`] with its undelivered events
//! still pending; [`CommandDispatcher::redeliver`] retries them.
//!
//! This module contains no IO itself; it composes the store and bus traits.

use std::fmt::Debug;

use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use doorx_core::{AggregateRoot, DomainError, DomainResult};
use doorx_events::{Event, EventBus, EventDispatchError, EventDispatcher, EventEnvelope};

use crate::repository::{AggregateStore, Repository, RepositoryError, UnitOfWork};

#[derive(Debug, Error)]
pub enum DispatchError<A: Debug> {
    /// Business rule rejected the command. Nothing was staged.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage failure, including optimistic concurrency conflicts.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{aggregate_type} {id} not found")]
    NotFound {
        aggregate_type: &'static str,
        id: Uuid,
    },

    /// State was committed but publication failed. `aggregate` is the
    /// committed aggregate; events not yet published are still pending on it.
    #[error("committed, but publication failed: {source}")]
    Publish {
        source: EventDispatchError,
        aggregate: Box<A>,
    },
}

impl<A: Debug> DispatchError<A> {
    /// True when reloading and re-running the command may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DispatchError::Repository(RepositoryError::Concurrency(_))
        )
    }

    /// The committed aggregate carried by a publication failure.
    pub fn into_aggregate(self) -> Option<A> {
        match self {
            DispatchError::Publish { aggregate, .. } => Some(*aggregate),
            _ => None,
        }
    }
}

/// Reusable command execution engine for persisted aggregates.
///
/// ## Generic Parameters
///
/// - `S`: aggregate store (anything implementing [`AggregateStore`] for the
///   aggregate types it is used with)
/// - `B`: event bus receiving [`EventEnvelope`]s of those aggregates' events
#[derive(Debug)]
pub struct CommandDispatcher<S, B> {
    store: S,
    events: EventDispatcher<B>,
}

impl<S, B> CommandDispatcher<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self {
            store,
            events: EventDispatcher::new(bus),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bus(&self) -> &B {
        self.events.bus()
    }

    /// Persist a newly created aggregate and publish its creation events.
    ///
    /// Returns the aggregate with its event buffer cleared.
    #[instrument(skip_all, fields(aggregate_type = A::aggregate_type()))]
    pub fn create<A>(&self, aggregate: A) -> Result<A, DispatchError<A>>
    where
        S: AggregateStore<A>,
        A: AggregateRoot + Debug,
        A::Id: Copy + Into<Uuid>,
        A::Event: Event,
        B: EventBus<EventEnvelope<A::Event>>,
    {
        let id: Uuid = (*aggregate.id()).into();

        let mut session = self.store.begin();
        session.add(&aggregate)?;
        session.commit()?;

        let (aggregate, published) = self.publish(aggregate)?;
        info!(aggregate_id = %id, published, "aggregate created");

        Ok(aggregate)
    }

    /// Load aggregate `id`, apply `operation`, commit and publish.
    ///
    /// Returns the updated aggregate with its event buffer cleared.
    #[instrument(skip_all, fields(aggregate_type = A::aggregate_type()))]
    pub fn execute<A, F>(&self, id: A::Id, operation: F) -> Result<A, DispatchError<A>>
    where
        S: AggregateStore<A>,
        A: AggregateRoot + Debug,
        A::Id: Copy + Into<Uuid>,
        A::Event: Event,
        B: EventBus<EventEnvelope<A::Event>>,
        F: FnOnce(&mut A) -> DomainResult<()>,
    {
        let key: Uuid = id.into();

        // 1) Load
        let mut session = self.store.begin();
        let mut aggregate = session
            .get_by_id(&id)?
            .ok_or(DispatchError::NotFound {
                aggregate_type: A::aggregate_type(),
                id: key,
            })?;

        // 2) Decide (domain rejection leaves store and bus untouched)
        operation(&mut aggregate)?;

        // 3) Persist
        session.update(&aggregate)?;
        session.commit()?;

        // 4) Publish
        let (aggregate, published) = self.publish(aggregate)?;
        info!(aggregate_id = %key, published, "command executed");

        Ok(aggregate)
    }

    /// Publish the events still pending on an already committed aggregate,
    /// typically one recovered from [`DispatchError::into_aggregate`].
    ///
    /// Nothing is written to the store. Consumers dedupe on `event_id`.
    #[instrument(skip_all, fields(aggregate_type = A::aggregate_type()))]
    pub fn redeliver<A>(&self, aggregate: A) -> Result<A, DispatchError<A>>
    where
        A: AggregateRoot + Debug,
        A::Id: Copy + Into<Uuid>,
        A::Event: Event,
        B: EventBus<EventEnvelope<A::Event>>,
    {
        let id: Uuid = (*aggregate.id()).into();
        let (aggregate, published) = self.publish(aggregate)?;
        info!(aggregate_id = %id, published, "pending events redelivered");
        Ok(aggregate)
    }

    fn publish<A>(&self, mut aggregate: A) -> Result<(A, usize), DispatchError<A>>
    where
        A: AggregateRoot + Debug,
        A::Id: Copy + Into<Uuid>,
        A::Event: Event,
        B: EventBus<EventEnvelope<A::Event>>,
    {
        match self.events.dispatch(&mut aggregate) {
            Ok(published) => Ok((aggregate, published)),
            Err(source) => {
                warn!(
                    pending = aggregate.domain_events().len(),
                    "returning committed aggregate with undelivered events"
                );
                Err(DispatchError::Publish {
                    source,
                    aggregate: Box::new(aggregate),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{Duration, Utc};
    use doorx_core::{ErrorKind, PropertyId, TenantId, VendorId};
    use doorx_events::{InMemoryEventBus, Subscription};
    use doorx_work_orders::{
        Money, Priority, ServiceCategory, VendorBid, WorkOrder, WorkOrderEvent, WorkOrderId,
        WorkOrderStatus, codes,
    };

    use crate::work_orders::InMemoryWorkOrderStore;

    type Dispatcher =
        CommandDispatcher<InMemoryWorkOrderStore, InMemoryEventBus<EventEnvelope<WorkOrderEvent>>>;

    fn dispatcher() -> Dispatcher {
        CommandDispatcher::new(InMemoryWorkOrderStore::new(), InMemoryEventBus::new())
    }

    fn new_order() -> WorkOrder {
        WorkOrder::create(
            TenantId::new(),
            PropertyId::new(),
            "No hot water",
            ServiceCategory::Plumbing,
            Priority::Emergency,
            None,
        )
        .unwrap()
    }

    fn event_types(sub: &Subscription<EventEnvelope<WorkOrderEvent>>) -> Vec<String> {
        sub.drain().iter().map(|e| e.event_type().to_string()).collect()
    }

    /// Bus that refuses every message while `down` is set.
    #[derive(Default)]
    struct FlakyBus {
        down: AtomicBool,
        inner: InMemoryEventBus<EventEnvelope<WorkOrderEvent>>,
    }

    impl FlakyBus {
        fn set_down(&self, down: bool) {
            self.down.store(down, Ordering::SeqCst);
        }
    }

    impl EventBus<EventEnvelope<WorkOrderEvent>> for FlakyBus {
        type Error = String;

        fn publish(&self, message: EventEnvelope<WorkOrderEvent>) -> Result<(), Self::Error> {
            if self.down.load(Ordering::SeqCst) {
                return Err("broker unavailable".to_string());
            }
            self.inner.publish(message).map_err(|e| format!("{e:?}"))
        }

        fn subscribe(&self) -> Subscription<EventEnvelope<WorkOrderEvent>> {
            self.inner.subscribe()
        }
    }

    #[test]
    fn create_commits_then_publishes() {
        let d = dispatcher();
        let sub = d.bus().subscribe();

        let order = d.create(new_order()).unwrap();

        assert!(order.domain_events().is_empty());
        assert_eq!(d.store().version_of(order.id_typed().into()).unwrap(), Some(1));
        assert_eq!(event_types(&sub), vec!["work_orders.order.created"]);
    }

    #[test]
    fn execute_runs_operation_and_publishes_its_events() {
        let d = dispatcher();
        let sub = d.bus().subscribe();
        let id = d.create(new_order()).unwrap().id_typed();
        sub.drain();

        let order = d
            .execute(id, |o: &mut WorkOrder| {
                o.transition_to(WorkOrderStatus::Categorized)
            })
            .unwrap();

        assert_eq!(order.status(), WorkOrderStatus::Categorized);
        assert_eq!(d.store().version_of(id.into()).unwrap(), Some(2));

        let received = sub.drain();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].aggregate_id(), Uuid::from(id));
        assert_eq!(received[0].aggregate_type(), "work_orders.order");
        assert!(matches!(
            received[0].payload(),
            WorkOrderEvent::StatusChanged(e) if e.new_status == WorkOrderStatus::Categorized
        ));
    }

    #[test]
    fn domain_rejection_touches_nothing() {
        let d = dispatcher();
        let sub = d.bus().subscribe();
        let id = d.create(new_order()).unwrap().id_typed();
        sub.drain();

        let err = d
            .execute(id, |o: &mut WorkOrder| o.close())
            .unwrap_err();

        match err {
            DispatchError::Domain(e) => {
                assert_eq!(e.kind(), ErrorKind::Validation);
                assert_eq!(e.code(), codes::CLOSE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(d.store().version_of(id.into()).unwrap(), Some(1));
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn only_concurrency_conflicts_are_retryable() {
        let stale =
            DispatchError::<WorkOrder>::Repository(RepositoryError::Concurrency("stale".into()));
        let domain =
            DispatchError::<WorkOrder>::Domain(DomainError::conflict(codes::STATUS, "final"));
        assert!(stale.is_retryable());
        assert!(!domain.is_retryable());
        assert!(stale.into_aggregate().is_none());
    }

    #[test]
    fn failed_publication_hands_back_aggregate_for_redelivery() {
        let d = CommandDispatcher::new(InMemoryWorkOrderStore::new(), FlakyBus::default());
        let sub = d.bus().subscribe();
        d.bus().set_down(true);

        let order = new_order();
        let id = order.id_typed();
        let err = d.create(order).unwrap_err();
        assert!(matches!(err, DispatchError::Publish { .. }));
        assert!(!err.is_retryable());

        let pending = err.into_aggregate().expect("committed aggregate");
        assert_eq!(pending.domain_events().len(), 1);
        assert_eq!(d.store().version_of(id.into()).unwrap(), Some(1));
        assert!(sub.drain().is_empty());

        d.bus().set_down(false);
        let delivered = d.redeliver(pending).unwrap();
        assert!(delivered.domain_events().is_empty());
        assert_eq!(event_types(&sub), vec!["work_orders.order.created"]);
        assert_eq!(d.store().version_of(id.into()).unwrap(), Some(1));
    }

    #[test]
    fn failed_publication_after_execute_keeps_commit_and_events() {
        let d = CommandDispatcher::new(InMemoryWorkOrderStore::new(), FlakyBus::default());
        let sub = d.bus().subscribe();
        let id = d.create(new_order()).unwrap().id_typed();
        sub.drain();

        d.bus().set_down(true);
        let pending = d
            .execute(id, |o: &mut WorkOrder| {
                o.transition_to(WorkOrderStatus::Categorized)
            })
            .unwrap_err()
            .into_aggregate()
            .expect("committed aggregate");
        assert_eq!(pending.status(), WorkOrderStatus::Categorized);
        assert_eq!(d.store().version_of(id.into()).unwrap(), Some(2));

        // Still down: the aggregate comes back again, events intact.
        let pending = d.redeliver(pending).unwrap_err().into_aggregate().unwrap();
        assert_eq!(pending.domain_events().len(), 1);

        d.bus().set_down(false);
        d.redeliver(pending).unwrap();
        assert_eq!(event_types(&sub), vec!["work_orders.order.status_changed"]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let d = dispatcher();
        let err = d
            .execute(WorkOrderId::new(), |o: &mut WorkOrder| o.close())
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::NotFound { aggregate_type: "work_orders.order", .. }
        ));
    }

    #[test]
    fn assign_vendor_publishes_status_change_then_assignment() {
        let d = dispatcher();
        let sub = d.bus().subscribe();
        let vendor_id = VendorId::new();
        let id = d.create(new_order()).unwrap().id_typed();

        d.execute(id, |o: &mut WorkOrder| {
            o.transition_to(WorkOrderStatus::Categorized)?;
            o.transition_to(WorkOrderStatus::VendorSearch)?;
            o.transition_to(WorkOrderStatus::Bidding)?;
            o.add_bid(VendorBid::create(vendor_id, Money::usd(42000)?, None, None))
        })
        .unwrap();
        sub.drain();

        d.execute(id, |o: &mut WorkOrder| {
            o.assign_vendor(vendor_id, Utc::now() + Duration::hours(4))
        })
        .unwrap();

        let received = sub.drain();
        let types: Vec<_> = received.iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec!["work_orders.order.status_changed", "work_orders.order.vendor_assigned"]
        );
        assert_eq!(received[0].sequence_number(), 1);
        assert_eq!(received[1].sequence_number(), 2);
    }
}
