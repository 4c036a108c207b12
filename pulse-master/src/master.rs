//! Master
//!
//! Ties a run together: liveness window, both scheduling passes, snapshot
//! assembly and the commit to the snapshot repository.

use pulse_core::domain::snapshot::StatusSnapshot;
use pulse_core::domain::worker::LivenessSet;
use pulse_core::trace::TraceEvent;
use tracing::{error, info, warn};

use crate::collector::{CollectorSettings, HeartbeatCollector};
use crate::config::MasterConfig;
use crate::error::Result;
use crate::repository::SnapshotRepository;
use crate::scheduler::{JobScheduler, SchedulerError};
use crate::service::TraceSink;
use crate::transport::Transport;

/// Coordinator for a single run
pub struct Master {
    pool_size: u32,
    collector: HeartbeatCollector,
    scheduler: JobScheduler,
}

impl Master {
    pub fn new(config: &MasterConfig) -> Self {
        Self {
            pool_size: config.pool_size,
            collector: HeartbeatCollector::new(CollectorSettings::from(config)),
            scheduler: JobScheduler::new(config.job_count),
        }
    }

    /// Runs the liveness window, schedules the batch and commits the snapshot
    ///
    /// The snapshot is returned even though it has been committed, so callers
    /// can report on it. A failed commit is traced before it is returned.
    pub async fn run<T>(
        &self,
        transport: &mut T,
        trace: &dyn TraceSink,
        repository: &dyn SnapshotRepository,
    ) -> Result<StatusSnapshot>
    where
        T: Transport + ?Sized,
    {
        trace.record(TraceEvent::MasterStarted);
        info!(
            "Master started (pool: {}, jobs: {})",
            self.pool_size,
            self.scheduler.job_count()
        );

        let alive = self.collector.collect(transport, self.pool_size, trace).await;
        let snapshot = self.assemble(&alive, trace);

        if let Err(e) = repository.commit(&snapshot).await {
            error!("Failed to commit snapshot: {}", e);
            trace.record(TraceEvent::SnapshotFailed {
                reason: e.to_string(),
            });
            return Err(e);
        }

        trace.record(TraceEvent::MasterDone);
        Ok(snapshot)
    }

    /// Builds the snapshot for a frozen liveness set
    ///
    /// Neither strategy runs when the set is empty; the snapshot records
    /// that no worker was alive instead.
    pub fn assemble(&self, alive: &LivenessSet, trace: &dyn TraceSink) -> StatusSnapshot {
        match self.scheduler.run_all(alive, trace) {
            Ok((round_robin, least_connections)) => StatusSnapshot::assigned(
                alive.clone(),
                round_robin.report(),
                least_connections.report(),
            ),
            Err(SchedulerError::NoWorkersAlive) => {
                warn!("No workers alive after the liveness window, skipping job assignment");
                trace.record(TraceEvent::NoWorkersAlive);
                StatusSnapshot::no_workers_alive()
            }
        }
    }
}
