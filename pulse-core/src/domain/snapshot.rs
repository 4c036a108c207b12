//! Status snapshot
//!
//! The outcome of one coordination run, as persisted for external
//! consumers. A snapshot is assembled once, fully in memory, and never
//! changed afterwards.

use serde::{Deserialize, Serialize};

use crate::domain::job::{Assignment, StrategyKind};
use crate::domain::worker::LivenessSet;

/// Error message recorded when the liveness window closes with nobody alive
pub const NO_WORKERS_ALIVE: &str = "no workers alive";

/// Assignments produced by one strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Labels in ascending job order, e.g. `Job 1 -> P2`
    pub job_assignments: Vec<String>,

    /// Strategy name
    pub strategy: String,

    /// Sum of per-worker loads at the end of the pass
    pub total_load: u32,
}

impl StrategyReport {
    pub fn new(kind: StrategyKind, assignments: &[Assignment], total_load: u32) -> Self {
        Self {
            job_assignments: assignments.iter().map(Assignment::label).collect(),
            strategy: kind.name().to_string(),
            total_load,
        }
    }
}

/// Persisted record of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Alive workers, ascending
    pub active_processors: LivenessSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_robin: Option<StrategyReport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub least_connection: Option<StrategyReport>,

    /// Set when no assignment pass ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusSnapshot {
    /// Snapshot of a run where both strategies placed every job
    pub fn assigned(
        active_processors: LivenessSet,
        round_robin: StrategyReport,
        least_connection: StrategyReport,
    ) -> Self {
        Self {
            active_processors,
            round_robin: Some(round_robin),
            least_connection: Some(least_connection),
            error: None,
        }
    }

    /// Snapshot of a run whose liveness window closed empty
    pub fn no_workers_alive() -> Self {
        Self {
            active_processors: LivenessSet::default(),
            round_robin: None,
            least_connection: None,
            error: Some(NO_WORKERS_ALIVE.to_string()),
        }
    }

    /// Whether any assignment pass ran
    pub fn has_assignments(&self) -> bool {
        self.round_robin.is_some() || self.least_connection.is_some()
    }

    /// Reports in their fixed order: round robin first
    pub fn reports(&self) -> impl Iterator<Item = &StrategyReport> {
        self.round_robin.iter().chain(self.least_connection.iter())
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::JobId;
    use crate::domain::worker::WorkerId;

    fn assignments(kind: StrategyKind, workers: &[u32]) -> Vec<Assignment> {
        workers
            .iter()
            .enumerate()
            .map(|(i, w)| Assignment {
                job: JobId::new(i as u32 + 1),
                worker: WorkerId::new(*w),
                strategy: kind,
                prior_load: 0,
            })
            .collect()
    }

    #[test]
    fn test_assigned_snapshot_shape() {
        let active = LivenessSet::from_ids([2, 3].map(WorkerId::new));
        let rr = StrategyReport::new(
            StrategyKind::RoundRobin,
            &assignments(StrategyKind::RoundRobin, &[2, 3]),
            2,
        );
        let lc = StrategyReport::new(
            StrategyKind::LeastConnection,
            &assignments(StrategyKind::LeastConnection, &[2, 3]),
            2,
        );
        let snapshot = StatusSnapshot::assigned(active, rr, lc);

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["active_processors"], serde_json::json!([2, 3]));
        assert_eq!(
            value["round_robin"]["job_assignments"],
            serde_json::json!(["Job 1 -> P2", "Job 2 -> P3"])
        );
        assert_eq!(value["round_robin"]["strategy"], "Round Robin");
        assert_eq!(value["least_connection"]["strategy"], "Least Connection");
        assert_eq!(value["least_connection"]["total_load"], 2);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_empty_snapshot_records_error() {
        let snapshot = StatusSnapshot::no_workers_alive();
        assert!(!snapshot.has_assignments());

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["active_processors"], serde_json::json!([]));
        assert_eq!(value["error"], NO_WORKERS_ALIVE);
        assert!(value.get("round_robin").is_none());
        assert!(value.get("least_connection").is_none());
    }

    #[test]
    fn test_snapshot_parses_back() {
        let snapshot = StatusSnapshot::no_workers_alive();
        let parsed = StatusSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
