//! Vendor bids: child entities owned exclusively by a [`crate::WorkOrder`].
//!
//! A bid has no repository and no access path of its own; it is created by a
//! vendor's quote, handed to [`crate::WorkOrder::add_bid`], and lives and dies
//! with that work order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doorx_core::{DomainError, DomainResult, Entity, VendorId, impl_entity_identity, impl_uuid_newtype};

use crate::errors::codes;
use crate::money::Money;

/// Identifier of a vendor bid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorBidId(Uuid);

impl_uuid_newtype!(VendorBidId, "VendorBidId");

/// One vendor's quote for a work order.
#[derive(Debug, Clone)]
pub struct VendorBid {
    id: VendorBidId,
    vendor_id: VendorId,
    estimated_cost: Money,
    proposed_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    submitted_at: DateTime<Utc>,
    is_accepted: bool,
}

impl_entity_identity!(VendorBid);

impl VendorBid {
    /// Record a new quote. `estimated_cost` is already validated by [`Money`].
    pub fn create(
        vendor_id: VendorId,
        estimated_cost: Money,
        proposed_date: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: VendorBidId::new(),
            vendor_id,
            estimated_cost,
            proposed_date,
            notes,
            submitted_at: Utc::now(),
            is_accepted: false,
        }
    }

    /// Rebuild a bid from persisted state. No validation is performed.
    pub fn rehydrate(snapshot: VendorBidSnapshot) -> Self {
        Self {
            id: snapshot.id,
            vendor_id: snapshot.vendor_id,
            estimated_cost: snapshot.estimated_cost,
            proposed_date: snapshot.proposed_date,
            notes: snapshot.notes,
            submitted_at: snapshot.submitted_at,
            is_accepted: snapshot.is_accepted,
        }
    }

    pub fn snapshot(&self) -> VendorBidSnapshot {
        VendorBidSnapshot {
            id: self.id,
            vendor_id: self.vendor_id,
            estimated_cost: self.estimated_cost.clone(),
            proposed_date: self.proposed_date,
            notes: self.notes.clone(),
            submitted_at: self.submitted_at,
            is_accepted: self.is_accepted,
        }
    }

    /// Replace cost, proposed date and notes. Accepted bids are frozen.
    pub fn update(
        &mut self,
        estimated_cost: Money,
        proposed_date: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> DomainResult<()> {
        if self.is_accepted {
            return Err(DomainError::validation(
                codes::BID_UPDATE,
                "cannot update an accepted bid",
            ));
        }

        self.estimated_cost = estimated_cost;
        self.proposed_date = proposed_date;
        self.notes = notes;
        Ok(())
    }

    /// Irreversible; only the owning work order calls this.
    pub(crate) fn accept(&mut self) {
        self.is_accepted = true;
    }

    pub fn id_typed(&self) -> VendorBidId {
        self.id
    }

    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }

    pub fn estimated_cost(&self) -> &Money {
        &self.estimated_cost
    }

    pub fn proposed_date(&self) -> Option<DateTime<Utc>> {
        self.proposed_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn is_accepted(&self) -> bool {
        self.is_accepted
    }
}

impl Entity for VendorBid {
    type Id = VendorBidId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Persisted form of a [`VendorBid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorBidSnapshot {
    pub id: VendorBidId,
    pub vendor_id: VendorId,
    pub estimated_cost: Money,
    pub proposed_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub is_accepted: bool,
}
