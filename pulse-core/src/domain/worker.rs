//! Worker domain types

use serde::{Deserialize, Serialize};

/// Identity of a worker in the pool
///
/// Valid identities lie in `[1, pool_size]`. Rank 0 belongs to the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(u32);

impl WorkerId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this identity belongs to a pool of `pool_size` workers
    pub fn is_in_pool(self, pool_size: u32) -> bool {
        (1..=pool_size).contains(&self.0)
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frozen set of workers that signalled liveness during a collection window
///
/// Always sorted ascending and free of duplicates. This ordering is the
/// cycle order for round robin and the tie-break order for least connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LivenessSet(Vec<WorkerId>);

impl LivenessSet {
    /// Builds a set from any collection of identities, sorting and deduplicating
    pub fn from_ids(ids: impl IntoIterator<Item = WorkerId>) -> Self {
        let mut ids: Vec<WorkerId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    pub fn as_slice(&self) -> &[WorkerId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: WorkerId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = WorkerId> + '_ {
        self.0.iter().copied()
    }
}
