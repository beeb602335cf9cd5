use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use doorx_core::{PropertyId, TenantId, VendorId};
use doorx_events::Event;

use crate::category::ServiceCategory;
use crate::money::Money;
use crate::order::WorkOrderId;
use crate::priority::Priority;
use crate::status::WorkOrderStatus;

/// Event: WorkOrderCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderCreated {
    pub work_order_id: WorkOrderId,
    pub tenant_id: TenantId,
    pub property_id: PropertyId,
    pub category: ServiceCategory,
    pub priority: Priority,
}

/// Event: StatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderStatusChanged {
    pub work_order_id: WorkOrderId,
    pub old_status: WorkOrderStatus,
    pub new_status: WorkOrderStatus,
}

/// Event: VendorBidReceived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorBidReceived {
    pub work_order_id: WorkOrderId,
    pub vendor_id: VendorId,
    pub estimated_cost: Money,
}

/// Event: VendorAssigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAssigned {
    pub work_order_id: WorkOrderId,
    pub vendor_id: VendorId,
    pub scheduled_for: DateTime<Utc>,
}

/// Event: WorkStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkStarted {
    pub work_order_id: WorkOrderId,
    pub vendor_id: VendorId,
}

/// Event: WorkCompleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCompleted {
    pub work_order_id: WorkOrderId,
    pub vendor_id: VendorId,
    pub completed_at: DateTime<Utc>,
}

/// Event: WorkOrderClosed (tenant confirmed satisfaction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderClosed {
    pub work_order_id: WorkOrderId,
    pub tenant_id: TenantId,
}

/// Event: WorkOrderCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderCancelled {
    pub work_order_id: WorkOrderId,
    pub reason: String,
}

/// Event: PriorityChanged. Only raised when the value actually differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderPriorityChanged {
    pub work_order_id: WorkOrderId,
    pub old_priority: Priority,
    pub new_priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkOrderEvent {
    Created(WorkOrderCreated),
    StatusChanged(WorkOrderStatusChanged),
    BidReceived(VendorBidReceived),
    VendorAssigned(VendorAssigned),
    WorkStarted(WorkStarted),
    WorkCompleted(WorkCompleted),
    Closed(WorkOrderClosed),
    Cancelled(WorkOrderCancelled),
    PriorityChanged(WorkOrderPriorityChanged),
}

impl WorkOrderEvent {
    pub fn work_order_id(&self) -> WorkOrderId {
        match self {
            WorkOrderEvent::Created(e) => e.work_order_id,
            WorkOrderEvent::StatusChanged(e) => e.work_order_id,
            WorkOrderEvent::BidReceived(e) => e.work_order_id,
            WorkOrderEvent::VendorAssigned(e) => e.work_order_id,
            WorkOrderEvent::WorkStarted(e) => e.work_order_id,
            WorkOrderEvent::WorkCompleted(e) => e.work_order_id,
            WorkOrderEvent::Closed(e) => e.work_order_id,
            WorkOrderEvent::Cancelled(e) => e.work_order_id,
            WorkOrderEvent::PriorityChanged(e) => e.work_order_id,
        }
    }
}

impl Event for WorkOrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            WorkOrderEvent::Created(_) => "work_orders.order.created",
            WorkOrderEvent::StatusChanged(_) => "work_orders.order.status_changed",
            WorkOrderEvent::BidReceived(_) => "work_orders.order.bid_received",
            WorkOrderEvent::VendorAssigned(_) => "work_orders.order.vendor_assigned",
            WorkOrderEvent::WorkStarted(_) => "work_orders.order.work_started",
            WorkOrderEvent::WorkCompleted(_) => "work_orders.order.work_completed",
            WorkOrderEvent::Closed(_) => "work_orders.order.closed",
            WorkOrderEvent::Cancelled(_) => "work_orders.order.cancelled",
            WorkOrderEvent::PriorityChanged(_) => "work_orders.order.priority_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}
