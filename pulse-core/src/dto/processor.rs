//! Processor DTOs
//!
//! Per-processor status derived from heartbeat and assignment trace lines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::trace::{TraceEvent, TraceLine};

/// Status of a processor as seen in a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorView {
    /// Worker identity
    pub id: u32,

    /// Whether the processor was seen alive
    pub alive: bool,

    /// Jobs placed on this processor, across every strategy pass
    pub jobs: Vec<u32>,
}

impl ProcessorView {
    fn new(id: u32, alive: bool) -> Self {
        Self {
            id,
            alive,
            jobs: Vec::new(),
        }
    }
}

/// Builds processor views from trace lines, ordered by processor id
///
/// A received heartbeat marks a processor alive. A job assignment also
/// implies the processor is alive, since only alive processors receive jobs.
/// A processor that only reported sending its heartbeat is listed as dead.
/// The trace is appended to across runs, so only the latest run counts.
pub fn processor_views(lines: &[TraceLine]) -> Vec<ProcessorView> {
    let mut status: BTreeMap<u32, ProcessorView> = BTreeMap::new();

    for line in lines {
        match &line.event {
            TraceEvent::MasterStarted => status.clear(),
            TraceEvent::HeartbeatReceived { worker } => {
                status
                    .entry(worker.get())
                    .or_insert_with(|| ProcessorView::new(worker.get(), true))
                    .alive = true;
            }
            TraceEvent::HeartbeatSent { worker } => {
                status
                    .entry(worker.get())
                    .or_insert_with(|| ProcessorView::new(worker.get(), false));
            }
            TraceEvent::JobAssigned { job, worker, .. } => {
                let view = status
                    .entry(worker.get())
                    .or_insert_with(|| ProcessorView::new(worker.get(), true));
                view.alive = true;
                view.jobs.push(job.get());
            }
            _ => {}
        }
    }

    status.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_views_from_trace() {
        let source = "\
Heartbeat from processor 3
Heartbeat from processor 2
--- Round Robin Job Assignment ---
Job 1 assigned to processor 2
Job 2 assigned to processor 3
Job 3 assigned to processor 2
--- Least Connection Job Assignment ---
Job 1 assigned to processor 2 (Least Load: 0)
";
        let views = processor_views(&TraceLine::parse_all(source));

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, 2);
        assert!(views[0].alive);
        assert_eq!(views[0].jobs, vec![1, 3, 1]);
        assert_eq!(views[1].id, 3);
        assert_eq!(views[1].jobs, vec![2]);
    }

    #[test]
    fn test_processor_without_heartbeat_line_is_still_alive() {
        let views = processor_views(&TraceLine::parse_all("Job 1 assigned to processor 4"));
        assert_eq!(
            views,
            vec![ProcessorView {
                id: 4,
                alive: true,
                jobs: vec![1]
            }]
        );
    }

    #[test]
    fn test_sent_but_unheard_heartbeat_is_dead() {
        let source = "\
Processor 1: Sent heartbeat.
Processor 2: Sent heartbeat.
Heartbeat from processor 2
";
        let views = processor_views(&TraceLine::parse_all(source));

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, 1);
        assert!(!views[0].alive);
        assert_eq!(views[1].id, 2);
        assert!(views[1].alive);
    }

    #[test]
    fn test_only_latest_run_counts() {
        let source = "\
Master started
Heartbeat from processor 1
--- Round Robin Job Assignment ---
Job 1 assigned to processor 1
Master done.
Master started
Heartbeat from processor 2
--- Round Robin Job Assignment ---
Job 1 assigned to processor 2
Master done.
";
        let views = processor_views(&TraceLine::parse_all(source));

        assert_eq!(
            views,
            vec![ProcessorView {
                id: 2,
                alive: true,
                jobs: vec![1]
            }]
        );
    }
}
