//! Per-entity mutual exclusion.
//!
//! Mutations of one record (read, modify, commit, publish) run while holding
//! that record's lock, so commits and their events are ordered per entity
//! while unrelated records proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use statuspage_core::types::DbId;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<DbId, Arc<Mutex<()>>>;

/// Lazily-populated table of one async mutex per entity id.
///
/// Entries are removed again when the last holder releases them.
#[derive(Clone, Default)]
pub struct EntityLocks {
    table: Arc<LockTable>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn lock(&self, id: DbId) -> EntityGuard {
        let mutex = self.table.entry(id).or_default().clone();
        let guard = mutex.lock_owned().await;
        EntityGuard {
            id,
            table: Arc::clone(&self.table),
            _guard: guard,
        }
    }

    /// Number of entities currently locked or awaited.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Held for the duration of one entity mutation.
pub struct EntityGuard {
    id: DbId,
    table: Arc<LockTable>,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for EntityGuard {
    fn drop(&mut self) {
        // Two references means the table and this guard; nobody is waiting.
        // Cloning happens under the shard lock, so the count cannot race.
        self.table
            .remove_if(&self.id, |_, mutex| Arc::strong_count(mutex) <= 2);
    }
}
