//! Heartbeat collector
//!
//! Drives the liveness window. The collector sweeps the whole pool with
//! non-blocking probes, sleeps for the sweep interval and repeats until the
//! window has elapsed. Whoever has not signalled by then is considered dead
//! for this run; there are no retries and no acknowledgements.

use pulse_core::domain::worker::LivenessSet;
use pulse_core::trace::TraceEvent;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::MasterConfig;
use crate::registry::WorkerRegistry;
use crate::service::TraceSink;
use crate::transport::{HEARTBEAT_TAG, Transport};

/// Timing of the liveness window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorSettings {
    pub window: Duration,
    pub sweep_interval: Duration,
    /// Stop as soon as every worker of the pool has reported
    pub early_exit: bool,
}

impl From<&MasterConfig> for CollectorSettings {
    fn from(config: &MasterConfig) -> Self {
        Self {
            window: config.window,
            sweep_interval: config.sweep_interval,
            early_exit: config.early_exit,
        }
    }
}

/// Runs the liveness window against a transport
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatCollector {
    settings: CollectorSettings,
}

impl HeartbeatCollector {
    pub fn new(settings: CollectorSettings) -> Self {
        Self { settings }
    }

    /// Collects heartbeats from a pool of `pool_size` workers
    ///
    /// Returns the alive workers, ascending, once the window closes.
    pub async fn collect<T>(
        &self,
        transport: &mut T,
        pool_size: u32,
        trace: &dyn TraceSink,
    ) -> LivenessSet
    where
        T: Transport + ?Sized,
    {
        let mut registry = WorkerRegistry::new(pool_size);

        trace.record(TraceEvent::ListeningForHeartbeats);
        info!(
            "Listening for heartbeats from {} worker(s) (window: {:?}, sweep interval: {:?})",
            pool_size, self.settings.window, self.settings.sweep_interval
        );

        let start = Instant::now();
        let mut sweeps = 0u64;

        while start.elapsed() < self.settings.window {
            let marked = Self::sweep(transport, &mut registry, trace);
            sweeps += 1;
            if marked > 0 {
                debug!(
                    "Sweep {} marked {} worker(s) alive ({} total)",
                    sweeps,
                    marked,
                    registry.alive_count()
                );
            }

            if self.settings.early_exit && registry.all_reported() {
                info!(
                    "All {} worker(s) reported after {:?}, closing window early",
                    pool_size,
                    start.elapsed()
                );
                break;
            }

            time::sleep(self.settings.sweep_interval).await;
        }

        let alive = registry.snapshot();
        info!(
            "Liveness window closed after {} sweep(s): {}/{} worker(s) alive",
            sweeps,
            alive.len(),
            pool_size
        );

        alive
    }

    /// Probes every worker once and returns how many were newly marked
    fn sweep<T>(transport: &mut T, registry: &mut WorkerRegistry, trace: &dyn TraceSink) -> usize
    where
        T: Transport + ?Sized,
    {
        let mut marked = 0;

        for worker in registry.pool() {
            if transport.try_receive(worker, HEARTBEAT_TAG).is_none() {
                continue;
            }

            match registry.mark_alive(worker) {
                Ok(true) => {
                    trace.record(TraceEvent::HeartbeatReceived { worker });
                    marked += 1;
                }
                Ok(false) => debug!("Ignoring redundant heartbeat from worker {}", worker),
                Err(e) => warn!("Ignoring heartbeat: {}", e),
            }
        }

        marked
    }
}
