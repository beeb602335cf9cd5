use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doorx_core::{
    AggregateRoot, AggregateState, DomainError, DomainEvent, DomainResult, Entity, PropertyId,
    TenantId, VendorId, impl_entity_identity, impl_uuid_newtype,
};

use crate::bid::{VendorBid, VendorBidSnapshot};
use crate::category::ServiceCategory;
use crate::errors::codes;
use crate::event::{
    VendorAssigned, VendorBidReceived, WorkCompleted, WorkOrderCancelled, WorkOrderClosed,
    WorkOrderCreated, WorkOrderEvent, WorkOrderPriorityChanged, WorkOrderStatusChanged,
    WorkStarted,
};
use crate::priority::Priority;
use crate::status::WorkOrderStatus;

/// Maximum number of vendor bids a single work order accepts.
pub const MAX_BIDS: usize = 5;

/// Work order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkOrderId(Uuid);

impl_uuid_newtype!(WorkOrderId, "WorkOrderId");

/// Aggregate root: WorkOrder.
///
/// Business rules enforced after every successful operation:
/// - at most [`MAX_BIDS`] bids, at most one per vendor
/// - `assigned_vendor_id` is set iff the matching bid is accepted
/// - status only moves along the [`WorkOrderStatus`] transition graph
/// - `completed_at` is only set once the order reached `Completed`
///
/// Other aggregates (tenant, property, vendor) are referenced by id only.
#[derive(Debug, Clone)]
pub struct WorkOrder {
    id: WorkOrderId,
    tenant_id: TenantId,
    property_id: PropertyId,
    issue_description: String,
    category: ServiceCategory,
    priority: Priority,
    status: WorkOrderStatus,
    assigned_vendor_id: Option<VendorId>,
    scheduled_for: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    bids: Vec<VendorBid>,
    external_reference: Option<String>,
    state: AggregateState<WorkOrderEvent>,
}

impl_entity_identity!(WorkOrder);

impl WorkOrder {
    /// Open a new work order for an issue a tenant reported.
    pub fn create(
        tenant_id: TenantId,
        property_id: PropertyId,
        issue_description: impl Into<String>,
        category: ServiceCategory,
        priority: Priority,
        external_reference: Option<String>,
    ) -> DomainResult<Self> {
        let issue_description = issue_description.into();
        ensure_description(&issue_description)?;

        let mut order = Self {
            id: WorkOrderId::new(),
            tenant_id,
            property_id,
            issue_description,
            category,
            priority,
            status: WorkOrderStatus::Open,
            assigned_vendor_id: None,
            scheduled_for: None,
            completed_at: None,
            bids: Vec::new(),
            external_reference,
            state: AggregateState::new(),
        };

        order.state.record(WorkOrderEvent::Created(WorkOrderCreated {
            work_order_id: order.id,
            tenant_id,
            property_id,
            category,
            priority,
        }));

        Ok(order)
    }

    /// Rebuild a work order from persisted state.
    ///
    /// The snapshot comes from a trusted store, so input validation is skipped
    /// and no events are recorded.
    pub fn rehydrate(snapshot: WorkOrderSnapshot) -> Self {
        Self {
            id: snapshot.id,
            tenant_id: snapshot.tenant_id,
            property_id: snapshot.property_id,
            issue_description: snapshot.issue_description,
            category: snapshot.category,
            priority: snapshot.priority,
            status: snapshot.status,
            assigned_vendor_id: snapshot.assigned_vendor_id,
            scheduled_for: snapshot.scheduled_for,
            completed_at: snapshot.completed_at,
            bids: snapshot.bids.into_iter().map(VendorBid::rehydrate).collect(),
            external_reference: snapshot.external_reference,
            state: AggregateState::rehydrate(snapshot.created_at, snapshot.modified_at),
        }
    }

    pub fn snapshot(&self) -> WorkOrderSnapshot {
        WorkOrderSnapshot {
            id: self.id,
            tenant_id: self.tenant_id,
            property_id: self.property_id,
            issue_description: self.issue_description.clone(),
            category: self.category,
            priority: self.priority,
            status: self.status,
            assigned_vendor_id: self.assigned_vendor_id,
            scheduled_for: self.scheduled_for,
            completed_at: self.completed_at,
            bids: self.bids.iter().map(VendorBid::snapshot).collect(),
            external_reference: self.external_reference.clone(),
            created_at: self.state.created_at(),
            modified_at: self.state.modified_at(),
        }
    }

    pub fn id_typed(&self) -> WorkOrderId {
        self.id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn property_id(&self) -> PropertyId {
        self.property_id
    }

    pub fn issue_description(&self) -> &str {
        &self.issue_description
    }

    pub fn category(&self) -> ServiceCategory {
        self.category
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn status(&self) -> WorkOrderStatus {
        self.status
    }

    pub fn assigned_vendor_id(&self) -> Option<VendorId> {
        self.assigned_vendor_id
    }

    pub fn scheduled_for(&self) -> Option<DateTime<Utc>> {
        self.scheduled_for
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn bids(&self) -> &[VendorBid] {
        &self.bids
    }

    pub fn bid_from(&self, vendor_id: VendorId) -> Option<&VendorBid> {
        self.bids.iter().find(|b| b.vendor_id() == vendor_id)
    }

    pub fn accepted_bid(&self) -> Option<&VendorBid> {
        self.bids.iter().find(|b| b.is_accepted())
    }

    pub fn external_reference(&self) -> Option<&str> {
        self.external_reference.as_deref()
    }

    pub fn can_transition_to(&self, target: WorkOrderStatus) -> bool {
        self.status.can_transition_to(target)
    }

    pub fn valid_transitions(&self) -> &'static [WorkOrderStatus] {
        self.status.valid_transitions()
    }

    /// Past the response window of its priority and still awaiting completion.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status.is_active()
            && self.status != WorkOrderStatus::Completed
            && self.priority.is_overdue(self.state.created_at(), now)
    }

    /// Move to `target` along the transition graph.
    ///
    /// This is the only place `status` changes; every lifecycle operation
    /// routes through it.
    pub fn transition_to(&mut self, target: WorkOrderStatus) -> DomainResult<()> {
        self.ensure_transition(target)?;

        let old_status = self.status;
        self.status = target;
        self.state.touch();
        self.state
            .record(WorkOrderEvent::StatusChanged(WorkOrderStatusChanged {
                work_order_id: self.id,
                old_status,
                new_status: target,
            }));

        Ok(())
    }

    pub fn add_bid(&mut self, bid: VendorBid) -> DomainResult<()> {
        if self.status.is_final() {
            return Err(DomainError::conflict(
                codes::ADD_BID,
                format!("cannot add bids to a {} work order", self.status),
            ));
        }

        if self.bids.len() >= MAX_BIDS {
            return Err(DomainError::conflict(
                codes::ADD_BID,
                format!("maximum {MAX_BIDS} bids allowed per work order"),
            ));
        }

        if self.bid_from(bid.vendor_id()).is_some() {
            return Err(DomainError::conflict(
                codes::ADD_BID,
                "vendor has already submitted a bid",
            ));
        }

        // Only assign_vendor may accept a bid.
        if bid.is_accepted() {
            return Err(DomainError::validation(
                codes::ADD_BID,
                "bid was already accepted elsewhere",
            ));
        }

        let vendor_id = bid.vendor_id();
        let estimated_cost = bid.estimated_cost().clone();
        self.bids.push(bid);
        self.state.touch();
        self.state
            .record(WorkOrderEvent::BidReceived(VendorBidReceived {
                work_order_id: self.id,
                vendor_id,
                estimated_cost,
            }));

        Ok(())
    }

    /// Accept `vendor_id`'s bid and schedule the work.
    ///
    /// All checks, including the move to `Scheduled`, run before anything is
    /// mutated: a rejected assignment leaves the bid unaccepted.
    pub fn assign_vendor(
        &mut self,
        vendor_id: VendorId,
        scheduled_for: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.status.is_final() {
            return Err(DomainError::conflict(
                codes::ASSIGN_VENDOR,
                format!("cannot assign a vendor to a {} work order", self.status),
            ));
        }

        let Some(idx) = self.bids.iter().position(|b| b.vendor_id() == vendor_id) else {
            return Err(DomainError::not_found(
                codes::ASSIGN_VENDOR,
                "no bid found from this vendor",
            ));
        };

        if scheduled_for <= Utc::now() {
            return Err(DomainError::validation(
                codes::SCHEDULED_FOR,
                "scheduled date must be in the future",
            ));
        }

        self.ensure_transition(WorkOrderStatus::Scheduled)?;

        self.bids[idx].accept();
        self.assigned_vendor_id = Some(vendor_id);
        self.scheduled_for = Some(scheduled_for);
        self.transition_to(WorkOrderStatus::Scheduled)?;

        self.state
            .record(WorkOrderEvent::VendorAssigned(VendorAssigned {
                work_order_id: self.id,
                vendor_id,
                scheduled_for,
            }));

        Ok(())
    }

    pub fn start_work(&mut self) -> DomainResult<()> {
        let vendor_id = self.require_vendor(
            codes::START_WORK,
            "cannot start work without an assigned vendor",
        )?;

        self.transition_to(WorkOrderStatus::InProgress)?;

        self.state.record(WorkOrderEvent::WorkStarted(WorkStarted {
            work_order_id: self.id,
            vendor_id,
        }));

        Ok(())
    }

    pub fn complete_work(&mut self) -> DomainResult<()> {
        let vendor_id = self.require_vendor(
            codes::COMPLETE_WORK,
            "cannot complete work without an assigned vendor",
        )?;

        self.transition_to(WorkOrderStatus::Completed)?;

        let completed_at = Utc::now();
        self.completed_at = Some(completed_at);
        self.state
            .record(WorkOrderEvent::WorkCompleted(WorkCompleted {
                work_order_id: self.id,
                vendor_id,
                completed_at,
            }));

        Ok(())
    }

    /// Close a completed order once the tenant confirmed the fix.
    pub fn close(&mut self) -> DomainResult<()> {
        if self.status.is_final() {
            return Err(DomainError::conflict(
                codes::CLOSE,
                format!("work order is already {}", self.status),
            ));
        }

        if self.status != WorkOrderStatus::Completed {
            return Err(DomainError::validation(
                codes::CLOSE,
                "can only close completed work orders",
            ));
        }

        self.transition_to(WorkOrderStatus::Closed)?;

        self.state.record(WorkOrderEvent::Closed(WorkOrderClosed {
            work_order_id: self.id,
            tenant_id: self.tenant_id,
        }));

        Ok(())
    }

    pub fn cancel(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        match self.status {
            WorkOrderStatus::Closed => {
                return Err(DomainError::conflict(
                    codes::CANCEL,
                    "cannot cancel a closed work order",
                ));
            }
            WorkOrderStatus::Cancelled => {
                return Err(DomainError::conflict(
                    codes::CANCEL,
                    "work order is already cancelled",
                ));
            }
            _ => {}
        }

        self.transition_to(WorkOrderStatus::Cancelled)?;

        self.state
            .record(WorkOrderEvent::Cancelled(WorkOrderCancelled {
                work_order_id: self.id,
                reason: reason.into(),
            }));

        Ok(())
    }

    pub fn update_description(&mut self, text: impl Into<String>) -> DomainResult<()> {
        if self.status.is_final() {
            return Err(DomainError::validation(
                codes::UPDATE_DESCRIPTION,
                "cannot update description of a finalized work order",
            ));
        }

        let text = text.into();
        ensure_description(&text)?;

        self.issue_description = text;
        self.state.touch();
        Ok(())
    }

    /// Change priority. Setting the current value again is a silent no-op.
    pub fn update_priority(&mut self, new_priority: Priority) -> DomainResult<()> {
        if self.status.is_final() {
            return Err(DomainError::validation(
                codes::UPDATE_PRIORITY,
                "cannot update priority of a finalized work order",
            ));
        }

        if self.priority == new_priority {
            return Ok(());
        }

        let old_priority = self.priority;
        self.priority = new_priority;
        self.state.touch();
        self.state
            .record(WorkOrderEvent::PriorityChanged(WorkOrderPriorityChanged {
                work_order_id: self.id,
                old_priority,
                new_priority,
            }));

        Ok(())
    }

    /// Link this order to its record in an external property-management system.
    pub fn set_external_reference(&mut self, reference: impl Into<String>) -> DomainResult<()> {
        if self.status.is_final() {
            return Err(DomainError::validation(
                codes::EXTERNAL_REFERENCE,
                "cannot relink a finalized work order",
            ));
        }

        self.external_reference = Some(reference.into());
        self.state.touch();
        Ok(())
    }

    fn ensure_transition(&self, target: WorkOrderStatus) -> DomainResult<()> {
        if self.status.is_final() {
            return Err(DomainError::conflict(
                codes::STATUS,
                format!("cannot transition from final state {}", self.status),
            ));
        }

        if !self.status.can_transition_to(target) {
            return Err(DomainError::conflict(
                codes::STATUS,
                format!("invalid transition from {} to {}", self.status, target),
            ));
        }

        Ok(())
    }

    fn require_vendor(&self, code: &'static str, description: &str) -> DomainResult<VendorId> {
        self.assigned_vendor_id
            .ok_or_else(|| DomainError::validation(code, description))
    }
}

fn ensure_description(text: &str) -> DomainResult<()> {
    if text.trim().is_empty() {
        return Err(DomainError::validation(
            codes::ISSUE_DESCRIPTION,
            "issue description is required",
        ));
    }
    Ok(())
}

impl Entity for WorkOrder {
    type Id = WorkOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for WorkOrder {
    type Event = WorkOrderEvent;

    fn aggregate_type() -> &'static str {
        "work_orders.order"
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.state.created_at()
    }

    fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.state.modified_at()
    }

    fn domain_events(&self) -> &[DomainEvent<WorkOrderEvent>] {
        self.state.events()
    }

    fn clear_domain_events(&mut self) {
        self.state.clear();
    }
}

/// Persisted form of a [`WorkOrder`]. Pending events are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderSnapshot {
    pub id: WorkOrderId,
    pub tenant_id: TenantId,
    pub property_id: PropertyId,
    pub issue_description: String,
    pub category: ServiceCategory,
    pub priority: Priority,
    pub status: WorkOrderStatus,
    pub assigned_vendor_id: Option<VendorId>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub bids: Vec<VendorBidSnapshot>,
    pub external_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}
