//! Work order domain module (maintenance requests, state-based).
//!
//! This crate contains the business rules for a work order's lifecycle, from a
//! tenant's report through vendor bidding and scheduling to completion, as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod bid;
pub mod category;
pub mod errors;
pub mod event;
pub mod money;
pub mod order;
pub mod priority;
pub mod status;

pub use bid::{VendorBid, VendorBidId, VendorBidSnapshot};
pub use category::ServiceCategory;
pub use errors::codes;
pub use event::{
    VendorAssigned, VendorBidReceived, WorkCompleted, WorkOrderCancelled, WorkOrderClosed,
    WorkOrderCreated, WorkOrderEvent, WorkOrderPriorityChanged, WorkOrderStatusChanged,
    WorkStarted,
};
pub use money::Money;
pub use order::{MAX_BIDS, WorkOrder, WorkOrderId, WorkOrderSnapshot};
pub use priority::Priority;
pub use status::WorkOrderStatus;
