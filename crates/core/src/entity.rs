//! Entity trait: identity + continuity across state changes.
//!
//! Two entities are the same entity iff they are of the same concrete type and
//! carry equal identifiers. No other field takes part in equality.

use core::any::{Any, TypeId};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier. Immutable after construction.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Identity comparison across arbitrary entity types.
///
/// Returns `false` whenever `A` and `B` are different concrete types, even if
/// their identifiers happen to hold the same value.
pub fn same_entity<A, B>(a: &A, b: &B) -> bool
where
    A: Entity + 'static,
    B: Entity + 'static,
{
    if TypeId::of::<A>() != TypeId::of::<B>() {
        return false;
    }

    (b.id() as &dyn Any)
        .downcast_ref::<A::Id>()
        .is_some_and(|other| other == a.id())
}

/// Derives `PartialEq`, `Eq` and `Hash` for an [`Entity`] from its id alone.
#[macro_export]
macro_rules! impl_entity_identity {
    ($t:ty) => {
        impl PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                $crate::Entity::id(self) == $crate::Entity::id(other)
            }
        }

        impl Eq for $t {}

        impl core::hash::Hash for $t {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                core::hash::Hash::hash($crate::Entity::id(self), state);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    #[derive(Debug)]
    struct Technician {
        id: u32,
        name: String,
    }

    impl Entity for Technician {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    impl_entity_identity!(Technician);

    #[derive(Debug)]
    struct Building {
        id: u32,
    }

    impl Entity for Building {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut h = DefaultHasher::new();
        value.hash(&mut h);
        h.finish()
    }

    #[test]
    fn same_id_means_equal_even_when_fields_differ() {
        let a = Technician {
            id: 7,
            name: "Ana".into(),
        };
        let b = Technician {
            id: 7,
            name: "Luis".into(),
        };
        assert_ne!(a.name, b.name);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert!(same_entity(&a, &b));
    }

    #[test]
    fn different_ids_are_not_equal() {
        let a = Technician {
            id: 1,
            name: "Ana".into(),
        };
        let b = Technician {
            id: 2,
            name: "Ana".into(),
        };
        assert_ne!(a, b);
        assert!(!same_entity(&a, &b));
    }

    #[test]
    fn different_types_with_equal_ids_are_never_the_same_entity() {
        let t = Technician {
            id: 3,
            name: "Ana".into(),
        };
        let b = Building { id: 3 };
        assert!(!same_entity(&t, &b));
        assert!(!same_entity(&b, &t));
    }
}
