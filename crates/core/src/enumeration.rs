//! Closed catalogs of named values (priorities, categories, statuses, ...).
//!
//! Each catalog is a plain Rust enum plus an explicit `ALL` table declared once
//! at compile time. Lookups scan that table; nothing is discovered at runtime.

/// A closed enumeration with a stable numeric id and display name per value.
pub trait Enumeration: Copy + Eq + core::fmt::Debug + 'static {
    /// Every value, ordered by id.
    const ALL: &'static [Self];

    /// Stable numeric id (used for storage).
    fn id(self) -> i32;

    /// Display name.
    fn name(self) -> &'static str;

    fn all() -> &'static [Self] {
        Self::ALL
    }

    fn from_id(id: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.id() == id)
    }

    /// Case-insensitive lookup by name. Blank input yields `None`.
    fn from_name(name: &str) -> Option<Self> {
        if name.trim().is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name))
    }

    fn is_defined_id(id: i32) -> bool {
        Self::from_id(id).is_some()
    }

    fn is_defined_name(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}
