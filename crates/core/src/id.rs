//! Strongly-typed identifiers used across the domain.
//!
//! Aggregates reference each other only through these values, never through
//! live references.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a tenant (the resident who reports issues).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

/// Identifier of a managed property.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(Uuid);

/// Identifier of a vendor (contractor).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(Uuid);

/// Implements constructors, conversions and parsing for a `Uuid` newtype.
///
/// Exported so bounded-context crates can declare their own ids the same way.
#[macro_export]
macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self($crate::__private::Uuid::now_v7())
            }

            /// The all-zero identifier.
            pub fn nil() -> Self {
                Self($crate::__private::Uuid::nil())
            }

            pub fn from_uuid(uuid: $crate::__private::Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &$crate::__private::Uuid {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$crate::__private::Uuid> for $t {
            fn from(value: $crate::__private::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for $crate::__private::Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = <$crate::__private::Uuid as core::str::FromStr>::from_str(s)
                    .map_err(|e| {
                        $crate::DomainError::validation(
                            $crate::error::INVALID_ID,
                            format!("{}: {}", $name, e),
                        )
                    })?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(TenantId, "TenantId");
impl_uuid_newtype!(PropertyId, "PropertyId");
impl_uuid_newtype!(VendorId, "VendorId");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn parse_round_trips_through_display() {
        let id = VendorId::new();
        let parsed: VendorId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_failure_is_validation_with_stable_code() {
        let err = "not-a-uuid".parse::<TenantId>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code(), crate::INVALID_ID);
        assert!(err.description().starts_with("TenantId"));
    }

    #[test]
    fn nil_is_all_zero() {
        assert!(PropertyId::nil().as_uuid().is_nil());
        assert_ne!(PropertyId::new(), PropertyId::nil());
    }
}
