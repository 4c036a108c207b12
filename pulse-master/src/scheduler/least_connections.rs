//! Least-connections strategy
//!
//! Every job goes to the worker holding the fewest jobs so far in this
//! pass. Ties go to the worker that comes first in the alive ordering,
//! which makes equally loaded workers fill up in round-robin order.
//!
//! The scan is O(jobs x workers). Both are small here; a larger pool would
//! want a min-heap keyed by (load, position), which yields the same order.

use pulse_core::domain::job::{Assignment, JobId, StrategyKind};
use pulse_core::domain::worker::WorkerId;

use super::{AssignmentStrategy, Result, SchedulerError, StrategyOutcome};

/// Assigns jobs `1..=job_count` to the least-loaded worker
///
/// Assignments come out in ascending job order; the final per-worker loads
/// always sum to `job_count`.
pub fn assign_least_connections(workers: &[WorkerId], job_count: u32) -> Result<StrategyOutcome> {
    if workers.is_empty() {
        return Err(SchedulerError::NoWorkersAlive);
    }

    // Indexed by position in `workers`
    let mut loads = vec![0u32; workers.len()];
    let mut assignments = Vec::with_capacity(job_count as usize);

    for job in JobId::batch(job_count) {
        let mut chosen = 0;
        for position in 1..loads.len() {
            if loads[position] < loads[chosen] {
                chosen = position;
            }
        }

        let prior_load = loads[chosen];
        loads[chosen] += 1;

        assignments.push(Assignment {
            job,
            worker: workers[chosen],
            strategy: StrategyKind::LeastConnection,
            prior_load,
        });
    }

    Ok(StrategyOutcome::new(
        StrategyKind::LeastConnection,
        workers,
        assignments,
        loads,
    ))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LeastConnections;

impl AssignmentStrategy for LeastConnections {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LeastConnection
    }

    fn assign(&self, workers: &[WorkerId], job_count: u32) -> Result<StrategyOutcome> {
        assign_least_connections(workers, job_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workers(ids: &[u32]) -> Vec<WorkerId> {
        ids.iter().copied().map(WorkerId::new).collect()
    }

    fn loads(pool: &[WorkerId], assignments: &[Assignment]) -> Vec<u32> {
        pool.iter()
            .map(|w| assignments.iter().filter(|a| a.worker == *w).count() as u32)
            .collect()
    }

    #[test]
    fn test_eight_jobs_on_three_workers() {
        let pool = workers(&[1, 2, 3]);
        let outcome = assign_least_connections(&pool, 8).unwrap();

        assert_eq!(outcome.total_load(), 8);
        assert_eq!(loads(&pool, &outcome.assignments), vec![3, 3, 2]);
        assert_eq!(
            outcome.loads,
            vec![
                (WorkerId::new(1), 3),
                (WorkerId::new(2), 3),
                (WorkerId::new(3), 2)
            ]
        );
    }

    #[test]
    fn test_loads_are_balanced_for_any_shape() {
        for k in 1..=6u32 {
            for job_count in 1..=20u32 {
                let pool: Vec<WorkerId> = (1..=k).map(|i| WorkerId::new(i * 2)).collect();
                let outcome = assign_least_connections(&pool, job_count).unwrap();
                let assignments = &outcome.assignments;

                let per_worker = loads(&pool, assignments);
                let max = *per_worker.iter().max().unwrap();
                let min = *per_worker.iter().min().unwrap();

                assert!(max - min <= 1, "k={} j={} loads={:?}", k, job_count, per_worker);
                assert_eq!(per_worker.iter().sum::<u32>(), job_count);
                assert_eq!(outcome.total_load(), job_count);

                let jobs: Vec<u32> = assignments.iter().map(|a| a.job.get()).collect();
                assert_eq!(jobs, (1..=job_count).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_ties_go_to_first_worker_in_order() {
        let outcome = assign_least_connections(&workers(&[2, 3, 5]), 8).unwrap();

        let placed: Vec<(u32, u32)> = outcome
            .assignments
            .iter()
            .map(|a| (a.worker.get(), a.prior_load))
            .collect();
        assert_eq!(
            placed,
            vec![
                (2, 0),
                (3, 0),
                (5, 0),
                (2, 1),
                (3, 1),
                (5, 1),
                (2, 2),
                (3, 2),
            ]
        );
    }

    #[test]
    fn test_repeated_passes_are_identical() {
        let pool = workers(&[7, 1, 4]);
        let first = assign_least_connections(&pool, 11).unwrap();
        let second = assign_least_connections(&pool, 11).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_large_worker_ids_do_not_index_loads() {
        let outcome = assign_least_connections(&workers(&[1000, 2000]), 3).unwrap();
        assert_eq!(outcome.total_load(), 3);
        assert_eq!(outcome.assignments[2].worker, WorkerId::new(1000));
        assert_eq!(outcome.load_of(WorkerId::new(1000)), Some(2));
    }

    #[test]
    fn test_no_workers() {
        assert_eq!(
            assign_least_connections(&[], 8),
            Err(SchedulerError::NoWorkersAlive)
        );
    }
}
