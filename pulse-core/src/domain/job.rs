//! Job and assignment domain types

use serde::{Deserialize, Serialize};

use crate::domain::worker::WorkerId;

/// Opaque job identity in `[1, job_count]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(u32);

impl JobId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// All job identities of a batch, ascending
    pub fn batch(job_count: u32) -> impl Iterator<Item = JobId> {
        (1..=job_count).map(JobId)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Load-balancing strategy used to place jobs on workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    RoundRobin,
    LeastConnection,
}

impl StrategyKind {
    /// Both strategies in the order they run within a single pass
    pub const ALL: [StrategyKind; 2] = [StrategyKind::RoundRobin, StrategyKind::LeastConnection];

    /// Human-readable name, as written to the snapshot and the trace
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::RoundRobin => "Round Robin",
            StrategyKind::LeastConnection => "Least Connection",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Placement of one job on one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub job: JobId,
    pub worker: WorkerId,
    pub strategy: StrategyKind,
    /// Jobs the worker already held in this pass when this one landed
    pub prior_load: u32,
}

impl Assignment {
    /// Label used in the persisted snapshot, e.g. `Job 1 -> P2`
    pub fn label(&self) -> String {
        format!("Job {} -> P{}", self.job, self.worker)
    }
}
