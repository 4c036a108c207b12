//! Worker registry
//!
//! Holds the liveness set while the collection window is open. Only the
//! collector touches it; once the window closes it is frozen into a
//! [`LivenessSet`].

use pulse_core::domain::worker::{LivenessSet, WorkerId};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("worker {id} is outside the pool of {pool_size} workers")]
    MalformedWorkerId { id: WorkerId, pool_size: u32 },
}

/// Liveness bookkeeping for a fixed pool
#[derive(Debug, Clone)]
pub struct WorkerRegistry {
    pool_size: u32,
    alive: BTreeSet<WorkerId>,
}

impl WorkerRegistry {
    pub fn new(pool_size: u32) -> Self {
        Self {
            pool_size,
            alive: BTreeSet::new(),
        }
    }

    /// Marks a worker alive
    ///
    /// Returns `Ok(true)` the first time a worker is marked and `Ok(false)`
    /// for every redundant signal after that.
    pub fn mark_alive(&mut self, id: WorkerId) -> Result<bool, RegistryError> {
        if !id.is_in_pool(self.pool_size) {
            return Err(RegistryError::MalformedWorkerId {
                id,
                pool_size: self.pool_size,
            });
        }

        Ok(self.alive.insert(id))
    }

    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    /// Whether every worker of the pool has reported
    pub fn all_reported(&self) -> bool {
        self.alive.len() == self.pool_size as usize
    }

    /// Every identity of the pool, ascending
    pub fn pool(&self) -> impl Iterator<Item = WorkerId> + use<> {
        (1..=self.pool_size).map(WorkerId::new)
    }

    /// Alive workers in ascending order
    pub fn snapshot(&self) -> LivenessSet {
        LivenessSet::from_ids(self.alive.iter().copied())
    }
}
