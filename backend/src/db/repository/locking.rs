//! Per-subject write serialization for schedule changes.
//!
//! Conflict checks read a subject's committed intervals and then commit a new
//! one. Two requests touching the same teacher or student must not interleave
//! between those steps, so both run while holding that subject's lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::models::UserId;

/// Held for the duration of a check-then-commit. Dropping it releases every
/// subject it covers.
#[derive(Debug)]
pub struct ScheduleLock {
    subjects: Vec<UserId>,
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl ScheduleLock {
    /// Locked subjects, ascending and without duplicates.
    pub fn subjects(&self) -> &[UserId] {
        &self.subjects
    }
}

#[async_trait]
pub trait ScheduleLocking: Send + Sync {
    /// Lock every subject in `subjects`, waiting for concurrent holders.
    async fn lock_subjects(&self, subjects: &[UserId]) -> ScheduleLock;
}

/// Lock table shared by repository implementations.
///
/// Locks are taken in ascending id order so that two callers locking
/// overlapping subject sets cannot deadlock.
#[derive(Debug, Default)]
pub struct SubjectLocks {
    table: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl SubjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, subjects: &[UserId]) -> ScheduleLock {
        let mut ids = subjects.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut table = self.table.lock();
            // Entries referenced only by the table have no holder or waiter.
            table.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            ids.iter()
                .map(|id| {
                    Arc::clone(
                        table
                            .entry(*id)
                            .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
                    )
                })
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }

        ScheduleLock {
            subjects: ids,
            _guards: guards,
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.table.lock().len()
    }
}
