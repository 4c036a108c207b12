//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::StrategyKind;
use crate::trace::{TraceEvent, TraceLine};

/// State of a job in a trace
///
/// Jobs carry no execution semantics, so placement is the only state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Assigned,
}

/// One job placement as seen in a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobView {
    pub id: u32,
    pub processor_id: u32,

    /// Strategy of the pass the placement belongs to, when a header preceded it
    pub strategy: Option<String>,

    pub status: JobState,
}

/// Builds one job view per assignment line of the latest run, in trace order
pub fn job_views(lines: &[TraceLine]) -> Vec<JobView> {
    let mut current: Option<StrategyKind> = None;
    let mut jobs = Vec::new();

    for line in lines {
        match &line.event {
            TraceEvent::StrategyStarted { strategy } => current = Some(*strategy),
            // Only the latest run counts
            TraceEvent::MasterStarted => {
                current = None;
                jobs.clear();
            }
            TraceEvent::JobAssigned { job, worker, .. } => jobs.push(JobView {
                id: job.get(),
                processor_id: worker.get(),
                strategy: current.map(|s| s.name().to_string()),
                status: JobState::Assigned,
            }),
            _ => {}
        }
    }

    jobs
}
