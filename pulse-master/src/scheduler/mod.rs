//! Job scheduler
//!
//! Places the job batch on the alive workers once the liveness window has
//! closed. Each strategy runs as an independent pass with its own load
//! counters; passes share no state.
//!
//! Load bookkeeping is always indexed by a worker's position in the alive
//! ordering, never by its identity, so non-contiguous alive sets such as
//! {2, 3, 5} need no special handling.

pub mod least_connections;
pub mod round_robin;

pub use least_connections::{LeastConnections, assign_least_connections};
pub use round_robin::{RoundRobin, assign_round_robin};

use pulse_core::domain::job::{Assignment, StrategyKind};
use pulse_core::domain::snapshot::StrategyReport;
use pulse_core::domain::worker::{LivenessSet, WorkerId};
use pulse_core::trace::TraceEvent;
use thiserror::Error;

use crate::service::TraceSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Assignment against an empty pool is undefined
    #[error("no workers alive to receive jobs")]
    NoWorkersAlive,
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// A load-balancing strategy
pub trait AssignmentStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Assigns jobs `1..=job_count`, in ascending order, to `workers`
    ///
    /// The outcome carries the loads the pass itself counted.
    ///
    /// # Errors
    /// Returns [`SchedulerError::NoWorkersAlive`] when `workers` is empty.
    fn assign(&self, workers: &[WorkerId], job_count: u32) -> Result<StrategyOutcome>;
}

/// Result of one strategy pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub kind: StrategyKind,
    pub assignments: Vec<Assignment>,
    /// Final load per worker, in alive order
    pub loads: Vec<(WorkerId, u32)>,
}

impl StrategyOutcome {
    /// Pairs position-indexed loads with the workers they were counted for
    pub fn new(
        kind: StrategyKind,
        workers: &[WorkerId],
        assignments: Vec<Assignment>,
        loads: Vec<u32>,
    ) -> Self {
        Self {
            kind,
            assignments,
            loads: workers.iter().copied().zip(loads).collect(),
        }
    }

    pub fn total_load(&self) -> u32 {
        self.loads.iter().map(|(_, load)| load).sum()
    }

    pub fn load_of(&self, worker: WorkerId) -> Option<u32> {
        self.loads
            .iter()
            .find(|(w, _)| *w == worker)
            .map(|(_, load)| *load)
    }

    /// The part of the outcome that goes into the snapshot
    pub fn report(&self) -> StrategyReport {
        StrategyReport::new(self.kind, &self.assignments, self.total_load())
    }
}

/// Runs strategy passes over a frozen liveness set
#[derive(Debug, Clone, Copy)]
pub struct JobScheduler {
    job_count: u32,
}

impl JobScheduler {
    pub fn new(job_count: u32) -> Self {
        Self { job_count }
    }

    pub fn job_count(&self) -> u32 {
        self.job_count
    }

    /// Runs one strategy pass and traces every placement
    ///
    /// The strategy is not invoked at all when `workers` is empty.
    pub fn run(
        &self,
        strategy: &dyn AssignmentStrategy,
        workers: &LivenessSet,
        trace: &dyn TraceSink,
    ) -> Result<StrategyOutcome> {
        if workers.is_empty() {
            return Err(SchedulerError::NoWorkersAlive);
        }

        let kind = strategy.kind();
        trace.record(TraceEvent::StrategyStarted { strategy: kind });

        let outcome = strategy.assign(workers.as_slice(), self.job_count)?;
        for assignment in &outcome.assignments {
            trace.record(TraceEvent::assigned(assignment));
        }

        tracing::debug!(
            "{} pass placed {} job(s) on {} worker(s)",
            kind,
            outcome.total_load(),
            workers.len()
        );

        Ok(outcome)
    }

    /// Runs both strategies, round robin first
    pub fn run_all(
        &self,
        workers: &LivenessSet,
        trace: &dyn TraceSink,
    ) -> Result<(StrategyOutcome, StrategyOutcome)> {
        let round_robin = self.run(&RoundRobin, workers, trace)?;
        let least_connections = self.run(&LeastConnections, workers, trace)?;
        Ok((round_robin, least_connections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MemoryTrace;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn alive(ids: &[u32]) -> LivenessSet {
        LivenessSet::from_ids(ids.iter().copied().map(WorkerId::new))
    }

    struct CountingStrategy {
        calls: AtomicUsize,
    }

    impl AssignmentStrategy for CountingStrategy {
        fn kind(&self) -> StrategyKind {
            StrategyKind::RoundRobin
        }

        fn assign(&self, workers: &[WorkerId], job_count: u32) -> Result<StrategyOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assign_round_robin(workers, job_count)
        }
    }

    #[test]
    fn test_empty_pool_never_invokes_strategy() {
        let strategy = CountingStrategy {
            calls: AtomicUsize::new(0),
        };
        let trace = MemoryTrace::new();

        let result = JobScheduler::new(8).run(&strategy, &LivenessSet::default(), &trace);

        assert_eq!(result, Err(SchedulerError::NoWorkersAlive));
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 0);
        assert!(trace.events().is_empty());
    }

    #[test]
    fn test_run_all_end_to_end() {
        let trace = MemoryTrace::new();
        let (rr, lc) = JobScheduler::new(8).run_all(&alive(&[2, 3, 5]), &trace).unwrap();

        let rr_workers: Vec<u32> = rr.assignments.iter().map(|a| a.worker.get()).collect();
        assert_eq!(rr_workers, vec![2, 3, 5, 2, 3, 5, 2, 3]);

        let lc_workers: Vec<u32> = lc.assignments.iter().map(|a| a.worker.get()).collect();
        let lc_prior: Vec<u32> = lc.assignments.iter().map(|a| a.prior_load).collect();
        assert_eq!(lc_workers, vec![2, 3, 5, 2, 3, 5, 2, 3]);
        assert_eq!(lc_prior, vec![0, 0, 0, 1, 1, 1, 2, 2]);

        assert_eq!(lc.load_of(WorkerId::new(2)), Some(3));
        assert_eq!(lc.load_of(WorkerId::new(3)), Some(3));
        assert_eq!(lc.load_of(WorkerId::new(5)), Some(2));
        assert_eq!(rr.total_load(), 8);
        assert_eq!(lc.total_load(), 8);
    }

    #[test]
    fn test_run_traces_header_then_each_job() {
        let trace = MemoryTrace::new();
        JobScheduler::new(3)
            .run(&LeastConnections, &alive(&[4]), &trace)
            .unwrap();

        let events = trace.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            TraceEvent::StrategyStarted {
                strategy: StrategyKind::LeastConnection
            }
        );
        assert_eq!(
            events[3].to_string(),
            "Job 3 assigned to processor 4 (Least Load: 2)"
        );
    }

    #[test]
    fn test_report_matches_snapshot_shape() {
        let trace = MemoryTrace::new();
        let outcome = JobScheduler::new(4)
            .run(&RoundRobin, &alive(&[1, 2]), &trace)
            .unwrap();

        let report = outcome.report();
        assert_eq!(report.strategy, "Round Robin");
        assert_eq!(report.total_load, 4);
        assert_eq!(
            report.job_assignments,
            vec!["Job 1 -> P1", "Job 2 -> P2", "Job 3 -> P1", "Job 4 -> P2"]
        );
    }

    #[test]
    fn test_report_total_comes_from_pass_loads() {
        let trace = MemoryTrace::new();
        let outcome = JobScheduler::new(5)
            .run(&LeastConnections, &alive(&[3, 9]), &trace)
            .unwrap();

        assert_eq!(
            outcome.loads,
            vec![(WorkerId::new(3), 3), (WorkerId::new(9), 2)]
        );
        assert_eq!(outcome.report().total_load, 5);
        assert_eq!(outcome.load_of(WorkerId::new(4)), None);
    }
}
