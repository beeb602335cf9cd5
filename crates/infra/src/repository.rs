//! Persistence contracts for aggregate roots.
//!
//! Work is staged through a [`Repository`] and made durable in one step by
//! [`UnitOfWork::commit`]. A store hands out sessions implementing both via
//! [`AggregateStore::begin`]:
//!
//! ```text
//! begin() → get_by_id / add / update / delete (staged) → commit() → dispatch events
//! ```
//!
//! Only aggregate state is persisted. Pending domain events stay on the
//! in-memory aggregate until an `EventDispatcher` hands them to the bus.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use doorx_core::AggregateRoot;

/// Storage-level failure (as opposed to a business rule violation).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Optimistic concurrency check failed: the row changed since it was loaded.
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("aggregate {0} already exists")]
    AlreadyExists(Uuid),

    #[error("aggregate {0} not found")]
    NotFound(Uuid),

    /// Write staged for an aggregate this session never loaded, so there is
    /// no version to check it against.
    #[error("aggregate {0} was not loaded in this session")]
    NotLoaded(Uuid),

    #[error("snapshot (de)serialization failed: {0}")]
    Serialization(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// An aggregate that can be written to and rebuilt from a serializable
/// snapshot. Rebuilding must not record any domain events.
pub trait Persisted: AggregateRoot + Sized {
    type Snapshot: Serialize + DeserializeOwned;

    fn to_snapshot(&self) -> Self::Snapshot;

    fn from_snapshot(snapshot: Self::Snapshot) -> Self;
}

/// Collection-like access to one aggregate type.
///
/// Writes are staged on the session; nothing is visible to other sessions
/// until the owning [`UnitOfWork`] commits.
pub trait Repository<A: AggregateRoot> {
    /// Load the committed state of `id`, remembering its version for the
    /// concurrency check at commit time.
    fn get_by_id(&mut self, id: &A::Id) -> Result<Option<A>, RepositoryError>;

    /// Load every committed aggregate, remembering each version.
    fn get_all(&mut self) -> Result<Vec<A>, RepositoryError>;

    fn add(&mut self, aggregate: &A) -> Result<(), RepositoryError>;

    /// Stage a write of `aggregate`. It must have been loaded (or added) in
    /// this session; otherwise `NotLoaded`.
    fn update(&mut self, aggregate: &A) -> Result<(), RepositoryError>;

    fn delete(&mut self, aggregate: &A) -> Result<(), RepositoryError>;
}

/// Atomic commit boundary. Returns the number of rows written.
///
/// Either every staged change is applied or none is.
pub trait UnitOfWork {
    fn commit(self) -> Result<usize, RepositoryError>;
}

/// Source of sessions for aggregate type `A`.
pub trait AggregateStore<A: AggregateRoot>: Send + Sync {
    type Session<'a>: Repository<A> + UnitOfWork
    where
        Self: 'a;

    fn begin(&self) -> Self::Session<'_>;
}

impl<A, S> AggregateStore<A> for std::sync::Arc<S>
where
    A: AggregateRoot,
    S: AggregateStore<A> + ?Sized,
{
    type Session<'a>
        = S::Session<'a>
    where
        Self: 'a;

    fn begin(&self) -> Self::Session<'_> {
        (**self).begin()
    }
}
