//! Stable error codes for the work order bounded context.
//!
//! API and UI layers key off these strings; descriptions may change freely.

pub mod codes {
    pub const ISSUE_DESCRIPTION: &str = "WorkOrder.IssueDescription";
    pub const STATUS: &str = "WorkOrder.Status";
    pub const ADD_BID: &str = "WorkOrder.AddBid";
    pub const ASSIGN_VENDOR: &str = "WorkOrder.AssignVendor";
    pub const SCHEDULED_FOR: &str = "WorkOrder.ScheduledFor";
    pub const START_WORK: &str = "WorkOrder.StartWork";
    pub const COMPLETE_WORK: &str = "WorkOrder.CompleteWork";
    pub const CLOSE: &str = "WorkOrder.Close";
    pub const CANCEL: &str = "WorkOrder.Cancel";
    pub const UPDATE_DESCRIPTION: &str = "WorkOrder.UpdateDescription";
    pub const UPDATE_PRIORITY: &str = "WorkOrder.UpdatePriority";
    pub const EXTERNAL_REFERENCE: &str = "WorkOrder.ExternalReference";
    pub const VENDOR_QUALIFICATION: &str = "WorkOrder.VendorQualification";

    pub const BID_UPDATE: &str = "VendorBid.Update";

    pub const MONEY_AMOUNT: &str = "Money.Amount";
    pub const MONEY_CURRENCY: &str = "Money.Currency";
}
