//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Value object contract.
///
/// Value objects are domain objects that are **immutable** and **compared by value**.
/// They represent concepts where identity doesn't matter - only the values matter.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two value objects with same values are equal)
/// - **Entity**: Has identity (two entities with same ID are the same entity)
///
/// Example:
/// - `Money { amount_minor: 15000, currency: "USD" }` is a value object
/// - `VendorBid { id: VendorBidId(...), .. }` is an entity
///
/// ## Equality components
///
/// Equality and hashing derive from the ordered sequence returned by
/// [`ValueObject::equality_components`]. A tuple is compared element-wise in
/// declaration order, so implementations must keep that order stable.
///
/// Values of different concrete types are never equal: `PartialEq` is only
/// implemented between values of the same type.
///
/// ## Usage Pattern
///
/// ```ignore
/// #[derive(Debug, Clone)]
/// struct Money {
///     amount_minor: i64,
///     currency: String,
/// }
///
/// impl ValueObject for Money {
///     type Components = (i64, String);
///
///     fn equality_components(&self) -> Self::Components {
///         (self.amount_minor, self.currency.clone())
///     }
/// }
///
/// impl_value_object_equality!(Money);
/// ```
pub trait ValueObject: Clone + core::fmt::Debug {
    /// Ordered equality components, usually a tuple.
    type Components: PartialEq + Eq + core::hash::Hash;

    fn equality_components(&self) -> Self::Components;
}

/// Derives `PartialEq`, `Eq` and `Hash` for a [`ValueObject`] from its
/// equality components.
#[macro_export]
macro_rules! impl_value_object_equality {
    ($t:ty) => {
        impl PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                $crate::ValueObject::equality_components(self)
                    == $crate::ValueObject::equality_components(other)
            }
        }

        impl Eq for $t {}

        impl core::hash::Hash for $t {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                core::hash::Hash::hash(&$crate::ValueObject::equality_components(self), state);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    #[derive(Debug, Clone)]
    struct ServiceWindow {
        start_hour: u8,
        end_hour: u8,
        label: String,
    }

    impl ValueObject for ServiceWindow {
        type Components = (u8, u8, String);

        fn equality_components(&self) -> Self::Components {
            (self.start_hour, self.end_hour, self.label.clone())
        }
    }

    impl_value_object_equality!(ServiceWindow);

    fn window(start_hour: u8, end_hour: u8, label: &str) -> ServiceWindow {
        ServiceWindow {
            start_hour,
            end_hour,
            label: label.to_string(),
        }
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut h = DefaultHasher::new();
        value.hash(&mut h);
        h.finish()
    }

    #[test]
    fn identical_components_are_equal_and_hash_identically() {
        let a = window(8, 17, "business");
        let b = window(8, 17, "business");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn component_order_matters() {
        assert_ne!(window(8, 17, "x"), window(17, 8, "x"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: changing any single component breaks equality.
            #[test]
            fn changing_one_component_breaks_equality(
                start in 0u8..24,
                end in 0u8..24,
                label in "[a-z]{1,12}",
                which in 0usize..3,
            ) {
                let original = window(start, end, &label);
                let mut changed = original.clone();
                match which {
                    0 => changed.start_hour = start.wrapping_add(1),
                    1 => changed.end_hour = end.wrapping_add(1),
                    _ => changed.label.push('z'),
                }

                prop_assert_eq!(&original, &original.clone());
                prop_assert_eq!(hash_of(&original), hash_of(&original.clone()));
                prop_assert_ne!(original, changed);
            }
        }
    }
}
