//! `doorx-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identity-based entities, attribute-based value objects, aggregate roots with
//! their pending event ledger, the error taxonomy and shared identifiers.

pub mod aggregate;
pub mod entity;
pub mod enumeration;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{AggregateRoot, AggregateState, DomainEvent, ExpectedVersion};
pub use entity::{Entity, same_entity};
pub use enumeration::Enumeration;
pub use error::{DomainError, DomainResult, ErrorKind, INVALID_ID};
pub use id::{PropertyId, TenantId, VendorId};
pub use value_object::ValueObject;

#[doc(hidden)]
pub mod __private {
    pub use uuid::Uuid;
}
