//! Round-robin strategy
//!
//! Job `i` goes to `workers[(i - 1) mod len(workers)]`. Stateless across
//! jobs and across passes.

use pulse_core::domain::job::{Assignment, JobId, StrategyKind};
use pulse_core::domain::worker::WorkerId;

use super::{AssignmentStrategy, Result, SchedulerError, StrategyOutcome};

/// Assigns jobs `1..=job_count` by cycling through `workers` in order
pub fn assign_round_robin(workers: &[WorkerId], job_count: u32) -> Result<StrategyOutcome> {
    if workers.is_empty() {
        return Err(SchedulerError::NoWorkersAlive);
    }

    let mut loads = vec![0u32; workers.len()];

    let assignments: Vec<Assignment> = JobId::batch(job_count)
        .map(|job| {
            let position = (job.get() as usize - 1) % workers.len();
            let prior_load = loads[position];
            loads[position] += 1;

            Assignment {
                job,
                worker: workers[position],
                strategy: StrategyKind::RoundRobin,
                prior_load,
            }
        })
        .collect();

    Ok(StrategyOutcome::new(
        StrategyKind::RoundRobin,
        workers,
        assignments,
        loads,
    ))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RoundRobin;

impl AssignmentStrategy for RoundRobin {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RoundRobin
    }

    fn assign(&self, workers: &[WorkerId], job_count: u32) -> Result<StrategyOutcome> {
        assign_round_robin(workers, job_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workers(ids: &[u32]) -> Vec<WorkerId> {
        ids.iter().copied().map(WorkerId::new).collect()
    }

    #[test]
    fn test_cycle_order_for_eight_jobs_on_three_workers() {
        let pool = workers(&[10, 20, 30]);
        let outcome = assign_round_robin(&pool, 8).unwrap();

        let positions: Vec<usize> = outcome
            .assignments
            .iter()
            .map(|a| pool.iter().position(|w| *w == a.worker).unwrap())
            .collect();
        assert_eq!(positions, vec![0, 1, 2, 0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_every_job_assigned_once_in_order() {
        for k in 1..=5u32 {
            for job_count in 1..=12u32 {
                let pool: Vec<WorkerId> = (1..=k).map(WorkerId::new).collect();
                let outcome = assign_round_robin(&pool, job_count).unwrap();
                let assignments = &outcome.assignments;
                assert_eq!(outcome.total_load(), job_count);

                let jobs: Vec<u32> = assignments.iter().map(|a| a.job.get()).collect();
                assert_eq!(jobs, (1..=job_count).collect::<Vec<_>>());
                for (i, assignment) in assignments.iter().enumerate() {
                    assert_eq!(assignment.worker, pool[i % pool.len()]);
                }
            }
        }
    }

    #[test]
    fn test_non_contiguous_workers() {
        let outcome = assign_round_robin(&workers(&[2, 3, 5]), 8).unwrap();
        let labels: Vec<String> = outcome.assignments.iter().map(Assignment::label).collect();
        assert_eq!(
            labels,
            vec![
                "Job 1 -> P2",
                "Job 2 -> P3",
                "Job 3 -> P5",
                "Job 4 -> P2",
                "Job 5 -> P3",
                "Job 6 -> P5",
                "Job 7 -> P2",
                "Job 8 -> P3",
            ]
        );
    }

    #[test]
    fn test_no_workers() {
        assert_eq!(
            assign_round_robin(&[], 8),
            Err(SchedulerError::NoWorkersAlive)
        );
    }
}
