//! Storage and application wiring for the work order aggregate.

use chrono::{DateTime, Utc};
use tracing::warn;

use doorx_core::{DomainError, DomainResult, VendorId};
use doorx_events::{EventBus, EventEnvelope};
use doorx_work_orders::{
    ServiceCategory, VendorBid, WorkOrder, WorkOrderEvent, WorkOrderId, WorkOrderSnapshot, codes,
};

use crate::command_dispatcher::{CommandDispatcher, DispatchError};
use crate::in_memory::InMemoryAggregateStore;
use crate::repository::{AggregateStore, Persisted};
use crate::vendors::VendorQualification;

pub type InMemoryWorkOrderStore = InMemoryAggregateStore<WorkOrder>;

impl Persisted for WorkOrder {
    type Snapshot = WorkOrderSnapshot;

    fn to_snapshot(&self) -> WorkOrderSnapshot {
        self.snapshot()
    }

    fn from_snapshot(snapshot: WorkOrderSnapshot) -> Self {
        WorkOrder::rehydrate(snapshot)
    }
}

/// Vendor-facing work order commands.
///
/// Each command checks the vendor against `Q` for the order's category and
/// the property's ZIP code before the aggregate sees it. The ZIP code is
/// resolved by the caller from the property record.
#[derive(Debug)]
pub struct WorkOrderService<S, B, Q> {
    dispatcher: CommandDispatcher<S, B>,
    vendors: Q,
}

impl<S, B, Q> WorkOrderService<S, B, Q>
where
    S: AggregateStore<WorkOrder>,
    B: EventBus<EventEnvelope<WorkOrderEvent>>,
    Q: VendorQualification,
{
    pub fn new(dispatcher: CommandDispatcher<S, B>, vendors: Q) -> Self {
        Self {
            dispatcher,
            vendors,
        }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher<S, B> {
        &self.dispatcher
    }

    pub fn submit_bid(
        &self,
        id: WorkOrderId,
        bid: VendorBid,
        service_zip: &str,
    ) -> Result<WorkOrder, DispatchError<WorkOrder>> {
        let vendor_id = bid.vendor_id();
        self.dispatcher.execute(id, |order: &mut WorkOrder| {
            self.ensure_qualified(vendor_id, order.category(), service_zip)?;
            order.add_bid(bid)
        })
    }

    /// Vendors are checked again here; availability may have changed since
    /// the bid came in.
    pub fn assign_vendor(
        &self,
        id: WorkOrderId,
        vendor_id: VendorId,
        scheduled_for: DateTime<Utc>,
        service_zip: &str,
    ) -> Result<WorkOrder, DispatchError<WorkOrder>> {
        self.dispatcher.execute(id, |order: &mut WorkOrder| {
            self.ensure_qualified(vendor_id, order.category(), service_zip)?;
            order.assign_vendor(vendor_id, scheduled_for)
        })
    }

    fn ensure_qualified(
        &self,
        vendor_id: VendorId,
        category: ServiceCategory,
        service_zip: &str,
    ) -> DomainResult<()> {
        if self.vendors.can_service(vendor_id, category, service_zip) {
            return Ok(());
        }

        warn!(
            vendor_id = %vendor_id,
            category = %category,
            service_zip,
            "vendor not qualified for work order"
        );
        Err(DomainError::validation(
            codes::VENDOR_QUALIFICATION,
            format!("vendor {vendor_id} does not service {category} work in {service_zip}"),
        ))
    }
}
