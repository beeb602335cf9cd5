use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::RwLock;

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};
use uuid::Uuid;

use doorx_core::ExpectedVersion;

use crate::repository::{AggregateStore, Persisted, Repository, RepositoryError, UnitOfWork};

#[derive(Debug, Clone)]
struct Row {
    version: u64,
    data: JsonValue,
}

#[derive(Debug)]
enum Staged {
    Add {
        id: Uuid,
        data: JsonValue,
    },
    Update {
        id: Uuid,
        expected: ExpectedVersion,
        data: JsonValue,
    },
    Delete {
        id: Uuid,
        expected: ExpectedVersion,
    },
}

impl Staged {
    fn id(&self) -> Uuid {
        match self {
            Staged::Add { id, .. } | Staged::Update { id, .. } | Staged::Delete { id, .. } => *id,
        }
    }
}

/// In-memory snapshot store with optimistic concurrency.
///
/// Each aggregate is kept as a JSON snapshot plus a version that starts at 1
/// and is bumped on every committed write. Intended for tests/dev.
#[derive(Debug)]
pub struct InMemoryAggregateStore<A> {
    rows: RwLock<HashMap<Uuid, Row>>,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A> Default for InMemoryAggregateStore<A> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            _aggregate: PhantomData,
        }
    }
}

impl<A> InMemoryAggregateStore<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let rows = self.rows.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }

    /// Committed version of `id`, if stored.
    pub fn version_of(&self, id: Uuid) -> Result<Option<u64>, RepositoryError> {
        let rows = self.rows.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(rows.get(&id).map(|r| r.version))
    }

    fn contains(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.version_of(id)?.is_some())
    }
}

impl<A> AggregateStore<A> for InMemoryAggregateStore<A>
where
    A: Persisted,
    A::Id: Copy + Into<Uuid>,
{
    type Session<'a>
        = InMemorySession<'a, A>
    where
        Self: 'a;

    fn begin(&self) -> Self::Session<'_> {
        InMemorySession {
            store: self,
            loaded: HashMap::new(),
            staged: Vec::new(),
        }
    }
}

/// A unit of work against an [`InMemoryAggregateStore`].
///
/// Reads always see committed state, not this session's staged writes.
/// Dropping the session without committing discards everything staged.
#[derive(Debug)]
pub struct InMemorySession<'a, A> {
    store: &'a InMemoryAggregateStore<A>,
    loaded: HashMap<Uuid, u64>,
    staged: Vec<Staged>,
}

impl<A> InMemorySession<'_, A>
where
    A: Persisted,
{
    /// Version a write of `id` must find at commit. Writes are only accepted
    /// for aggregates this session loaded.
    fn expected_for(&self, id: Uuid) -> Result<ExpectedVersion, RepositoryError> {
        self.loaded
            .get(&id)
            .map(|v| ExpectedVersion::Exact(*v))
            .ok_or(RepositoryError::NotLoaded(id))
    }

    fn staged_index(&self, id: Uuid) -> Option<usize> {
        self.staged.iter().position(|s| s.id() == id)
    }

    fn serialize(aggregate: &A) -> Result<JsonValue, RepositoryError> {
        serde_json::to_value(aggregate.to_snapshot())
            .map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    fn restore(&mut self, id: Uuid, row: Row) -> Result<A, RepositoryError> {
        let snapshot: A::Snapshot = serde_json::from_value(row.data)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.loaded.insert(id, row.version);
        Ok(A::from_snapshot(snapshot))
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }
}

impl<A> Repository<A> for InMemorySession<'_, A>
where
    A: Persisted,
    A::Id: Copy + Into<Uuid>,
{
    fn get_by_id(&mut self, id: &A::Id) -> Result<Option<A>, RepositoryError> {
        let key: Uuid = (*id).into();
        let row = {
            let rows = self
                .store
                .rows
                .read()
                .map_err(|_| RepositoryError::Poisoned)?;
            rows.get(&key).cloned()
        };

        row.map(|row| self.restore(key, row)).transpose()
    }

    fn get_all(&mut self) -> Result<Vec<A>, RepositoryError> {
        let mut rows: Vec<(Uuid, Row)> = {
            let rows = self
                .store
                .rows
                .read()
                .map_err(|_| RepositoryError::Poisoned)?;
            rows.iter().map(|(id, row)| (*id, row.clone())).collect()
        };
        rows.sort_by_key(|(id, _)| *id);

        rows.into_iter()
            .map(|(id, row)| self.restore(id, row))
            .collect()
    }

    fn add(&mut self, aggregate: &A) -> Result<(), RepositoryError> {
        let id: Uuid = (*aggregate.id()).into();
        if self.staged_index(id).is_some() || self.store.contains(id)? {
            return Err(RepositoryError::AlreadyExists(id));
        }

        let data = Self::serialize(aggregate)?;
        self.staged.push(Staged::Add { id, data });
        debug!(aggregate_type = A::aggregate_type(), aggregate_id = %id, "staged add");
        Ok(())
    }

    fn update(&mut self, aggregate: &A) -> Result<(), RepositoryError> {
        let id: Uuid = (*aggregate.id()).into();
        let data = Self::serialize(aggregate)?;

        match self.staged_index(id) {
            Some(idx) => match &mut self.staged[idx] {
                Staged::Add { data: staged, .. } | Staged::Update { data: staged, .. } => {
                    *staged = data;
                }
                Staged::Delete { .. } => return Err(RepositoryError::NotFound(id)),
            },
            None => {
                let expected = self.expected_for(id)?;
                self.staged.push(Staged::Update { id, expected, data });
            }
        }

        debug!(aggregate_type = A::aggregate_type(), aggregate_id = %id, "staged update");
        Ok(())
    }

    fn delete(&mut self, aggregate: &A) -> Result<(), RepositoryError> {
        let id: Uuid = (*aggregate.id()).into();

        match self.staged_index(id) {
            Some(idx) => match self.staged[idx] {
                Staged::Add { .. } => {
                    self.staged.remove(idx);
                }
                Staged::Update { expected, .. } => {
                    self.staged[idx] = Staged::Delete { id, expected };
                }
                Staged::Delete { .. } => return Err(RepositoryError::NotFound(id)),
            },
            None => {
                let expected = self.expected_for(id)?;
                self.staged.push(Staged::Delete { id, expected });
            }
        }

        debug!(aggregate_type = A::aggregate_type(), aggregate_id = %id, "staged delete");
        Ok(())
    }
}

impl<A> UnitOfWork for InMemorySession<'_, A>
where
    A: Persisted,
{
    fn commit(self) -> Result<usize, RepositoryError> {
        if self.staged.is_empty() {
            return Ok(0);
        }

        let store = self.store;
        let mut rows = store.rows.write().map_err(|_| RepositoryError::Poisoned)?;

        // Check everything before touching any row.
        for op in &self.staged {
            match op {
                Staged::Add { id, .. } => {
                    if rows.contains_key(id) {
                        warn!(
                            aggregate_type = A::aggregate_type(),
                            aggregate_id = %id,
                            "commit rejected: aggregate added concurrently"
                        );
                        return Err(RepositoryError::Concurrency(format!(
                            "aggregate {id} was added by another session"
                        )));
                    }
                }
                Staged::Update { id, expected, .. } | Staged::Delete { id, expected } => {
                    let Some(row) = rows.get(id) else {
                        return Err(RepositoryError::NotFound(*id));
                    };
                    if !expected.matches(row.version) {
                        warn!(
                            aggregate_type = A::aggregate_type(),
                            aggregate_id = %id,
                            expected = ?expected,
                            found = row.version,
                            "commit rejected: stale version"
                        );
                        return Err(RepositoryError::Concurrency(format!(
                            "aggregate {id}: expected {expected:?}, found {}",
                            row.version
                        )));
                    }
                }
            }
        }

        let written = self.staged.len();
        for op in self.staged {
            match op {
                Staged::Add { id, data } => {
                    rows.insert(id, Row { version: 1, data });
                }
                Staged::Update { id, data, .. } => {
                    if let Some(row) = rows.get_mut(&id) {
                        row.version += 1;
                        row.data = data;
                    }
                }
                Staged::Delete { id, .. } => {
                    rows.remove(&id);
                }
            }
        }

        info!(aggregate_type = A::aggregate_type(), rows = written, "unit of work committed");
        Ok(written)
    }
}
