//! Work order lifecycle states and the fixed transition graph.
//!
//! ```text
//! Open → Categorized → VendorSearch → Bidding → Scheduled → InProgress → Completed → Closed
//!                           ↑            │
//!                           └────────────┘
//! every non-final state except Completed → Cancelled
//! ```

use serde::{Deserialize, Serialize};

use doorx_core::Enumeration;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    Open,
    Categorized,
    VendorSearch,
    Bidding,
    Scheduled,
    InProgress,
    Completed,
    Closed,
    Cancelled,
}

use WorkOrderStatus::*;

/// Allowed successors per state. Built at compile time; not reconfigurable.
const TRANSITIONS: [(WorkOrderStatus, &[WorkOrderStatus]); 9] = [
    (Open, &[Categorized, Cancelled]),
    (Categorized, &[VendorSearch, Cancelled]),
    (VendorSearch, &[Bidding, Cancelled]),
    (Bidding, &[Scheduled, VendorSearch, Cancelled]),
    (Scheduled, &[InProgress, Cancelled]),
    (InProgress, &[Completed, Cancelled]),
    (Completed, &[Closed]),
    (Closed, &[]),
    (Cancelled, &[]),
];

impl Enumeration for WorkOrderStatus {
    const ALL: &'static [Self] = &[
        Open,
        Categorized,
        VendorSearch,
        Bidding,
        Scheduled,
        InProgress,
        Completed,
        Closed,
        Cancelled,
    ];

    fn id(self) -> i32 {
        match self {
            Open => 1,
            Categorized => 2,
            VendorSearch => 3,
            Bidding => 4,
            Scheduled => 5,
            InProgress => 6,
            Completed => 7,
            Closed => 8,
            Cancelled => 9,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Open => "Open",
            Categorized => "Categorized",
            VendorSearch => "VendorSearch",
            Bidding => "Bidding",
            Scheduled => "Scheduled",
            InProgress => "InProgress",
            Completed => "Completed",
            Closed => "Closed",
            Cancelled => "Cancelled",
        }
    }
}

impl WorkOrderStatus {
    pub fn description(self) -> &'static str {
        match self {
            Open => "Tenant reported problem",
            Categorized => "Problem type identified",
            VendorSearch => "Searching for available vendors",
            Bidding => "Waiting for vendor quotes",
            Scheduled => "Vendor assigned, date confirmed",
            InProgress => "Vendor working",
            Completed => "Work finished",
            Closed => "Tenant confirmed satisfaction",
            Cancelled => "Work order cancelled",
        }
    }

    /// Successor states reachable in one step.
    pub fn valid_transitions(self) -> &'static [WorkOrderStatus] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .unwrap_or(&[])
    }

    pub fn can_transition_to(self, target: WorkOrderStatus) -> bool {
        self.valid_transitions().contains(&target)
    }

    /// Closed and Cancelled have no outgoing edges.
    pub fn is_final(self) -> bool {
        matches!(self, Closed | Cancelled)
    }

    pub fn is_active(self) -> bool {
        !self.is_final()
    }

    pub fn allows_vendor_assignment(self) -> bool {
        self == Bidding
    }

    pub fn allows_modifications(self) -> bool {
        self.is_active()
    }

    /// Hex color used by dashboards.
    pub fn color_code(self) -> &'static str {
        match self {
            Open => "#9CA3AF",
            Categorized => "#6366F1",
            VendorSearch => "#8B5CF6",
            Bidding => "#3B82F6",
            Scheduled => "#F59E0B",
            InProgress => "#FBBF24",
            Completed => "#10B981",
            Closed => "#059669",
            Cancelled => "#DC2626",
        }
    }

    pub fn progress_percentage(self) -> u8 {
        match self {
            Open => 0,
            Categorized => 10,
            VendorSearch => 25,
            Bidding => 40,
            Scheduled => 50,
            InProgress => 75,
            Completed => 90,
            Closed => 100,
            Cancelled => 0,
        }
    }
}

impl core::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
