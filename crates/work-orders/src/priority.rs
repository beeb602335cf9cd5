use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use doorx_core::Enumeration;

/// Urgency level of a work order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Emergency,
    High,
    Normal,
    Low,
}

impl Enumeration for Priority {
    const ALL: &'static [Self] = &[
        Priority::Emergency,
        Priority::High,
        Priority::Normal,
        Priority::Low,
    ];

    fn id(self) -> i32 {
        match self {
            Priority::Emergency => 1,
            Priority::High => 2,
            Priority::Normal => 3,
            Priority::Low => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Priority::Emergency => "Emergency",
            Priority::High => "High",
            Priority::Normal => "Normal",
            Priority::Low => "Low",
        }
    }
}

impl Priority {
    /// Hours within which a response is expected.
    pub fn expected_response_hours(self) -> i64 {
        match self {
            Priority::Emergency => 24,
            Priority::High => 48,
            Priority::Normal => 120,
            Priority::Low => 168,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Priority::Emergency => "Safety issues, no water/electricity, severe damage",
            Priority::High => "Major problems affecting habitability",
            Priority::Normal => "Standard repairs and maintenance",
            Priority::Low => "Cosmetic improvements and minor issues",
        }
    }

    pub fn is_emergency(self) -> bool {
        self == Priority::Emergency
    }

    /// Emergency or High.
    pub fn is_urgent(self) -> bool {
        matches!(self, Priority::Emergency | Priority::High)
    }

    pub fn expected_response_time(self) -> Duration {
        Duration::hours(self.expected_response_hours())
    }

    pub fn expected_completion(self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.expected_response_time()
    }

    /// True once `now` is strictly past the expected completion.
    pub fn is_overdue(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now > self.expected_completion(created_at)
    }

    /// Hex color used by dashboards.
    pub fn color_code(self) -> &'static str {
        match self {
            Priority::Emergency => "#DC2626",
            Priority::High => "#F59E0B",
            Priority::Normal => "#3B82F6",
            Priority::Low => "#10B981",
        }
    }
}

impl core::fmt::Display for Priority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_and_lookup() {
        let ids: Vec<_> = Priority::all().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(Priority::from_name("high"), Some(Priority::High));
        assert_eq!(Priority::from_id(1), Some(Priority::Emergency));
        assert_eq!(Priority::from_id(5), None);
    }

    #[test]
    fn urgency() {
        assert!(Priority::Emergency.is_emergency());
        assert!(Priority::Emergency.is_urgent());
        assert!(Priority::High.is_urgent());
        assert!(!Priority::Normal.is_urgent());
        assert!(!Priority::Low.is_emergency());
    }

    #[test]
    fn overdue_is_strictly_after_expected_completion() {
        let created = Utc::now();
        let due = Priority::High.expected_completion(created);
        assert_eq!(due - created, Duration::hours(48));
        assert!(!Priority::High.is_overdue(created, due));
        assert!(Priority::High.is_overdue(created, due + Duration::seconds(1)));
    }

    #[test]
    fn display_uses_catalog_name() {
        assert_eq!(Priority::Normal.to_string(), "Normal");
        assert_eq!(Priority::Low.color_code(), "#10B981");
    }
}
