//! Simulated workers
//!
//! A worker's whole job in a run is to send one heartbeat to the master.
//! Simulated workers run as tasks and can be told to signal late or not at
//! all, which is how dead and slow workers are exercised.

use pulse_core::domain::worker::WorkerId;
use pulse_core::trace::TraceEvent;
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};
use tracing::{debug, warn};

use crate::service::TraceSink;
use crate::transport::{Envelope, TransportSender};

/// How a simulated worker behaves during the liveness window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerBehavior {
    /// Signals immediately
    Prompt,
    /// Signals after a delay
    Delayed(Duration),
    /// Never signals
    Silent,
}

impl FromStr for WorkerBehavior {
    type Err = String;

    /// Parses `prompt`, `silent` or `delayed:<millis>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "prompt" => Ok(WorkerBehavior::Prompt),
            "silent" => Ok(WorkerBehavior::Silent),
            other => {
                let millis = other
                    .strip_prefix("delayed:")
                    .ok_or_else(|| format!("unknown worker behavior: {}", other))?;
                let millis: u64 = millis
                    .parse()
                    .map_err(|_| format!("invalid delay in worker behavior: {}", other))?;
                Ok(WorkerBehavior::Delayed(Duration::from_millis(millis)))
            }
        }
    }
}

impl std::fmt::Display for WorkerBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerBehavior::Prompt => write!(f, "prompt"),
            WorkerBehavior::Delayed(delay) => write!(f, "delayed:{}", delay.as_millis()),
            WorkerBehavior::Silent => write!(f, "silent"),
        }
    }
}

/// A worker that sends at most one heartbeat
#[derive(Debug, Clone, Copy)]
pub struct SimulatedWorker {
    pub id: WorkerId,
    pub behavior: WorkerBehavior,
}

impl SimulatedWorker {
    pub fn new(id: WorkerId, behavior: WorkerBehavior) -> Self {
        Self { id, behavior }
    }

    /// Spawns the worker as a task
    pub fn spawn(self, sender: TransportSender, trace: Arc<dyn TraceSink>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let delay = match self.behavior {
                WorkerBehavior::Silent => {
                    debug!("Worker {} stays silent", self.id);
                    return;
                }
                WorkerBehavior::Prompt => Duration::ZERO,
                WorkerBehavior::Delayed(delay) => delay,
            };

            if !delay.is_zero() {
                time::sleep(delay).await;
            }

            match sender.send(Envelope::heartbeat(self.id)) {
                Ok(()) => trace.record(TraceEvent::HeartbeatSent { worker: self.id }),
                Err(e) => warn!("Worker {} could not send heartbeat: {}", self.id, e),
            }
        })
    }
}

/// Spawns one worker per behavior, numbered from 1
pub fn spawn_pool(
    behaviors: &[WorkerBehavior],
    sender: &TransportSender,
    trace: Arc<dyn TraceSink>,
) -> Vec<JoinHandle<()>> {
    behaviors
        .iter()
        .zip(1u32..)
        .map(|(behavior, id)| {
            SimulatedWorker::new(WorkerId::new(id), *behavior)
                .spawn(sender.clone(), Arc::clone(&trace))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MemoryTrace;
    use crate::transport::{ChannelTransport, HEARTBEAT_TAG, Transport};

    #[test]
    fn test_parse_behaviors() {
        assert_eq!("prompt".parse(), Ok(WorkerBehavior::Prompt));
        assert_eq!("silent".parse(), Ok(WorkerBehavior::Silent));
        assert_eq!(
            "delayed:250".parse(),
            Ok(WorkerBehavior::Delayed(Duration::from_millis(250)))
        );
        assert!("delayed:soon".parse::<WorkerBehavior>().is_err());
        assert!("asleep".parse::<WorkerBehavior>().is_err());
    }

    #[test]
    fn test_behavior_display_parses_back() {
        for behavior in [
            WorkerBehavior::Prompt,
            WorkerBehavior::Silent,
            WorkerBehavior::Delayed(Duration::from_millis(40)),
        ] {
            assert_eq!(behavior.to_string().parse(), Ok(behavior));
        }
    }

    #[tokio::test]
    async fn test_pool_sends_one_heartbeat_per_live_worker() {
        let (mut transport, sender) = ChannelTransport::channel(3);
        let trace = Arc::new(MemoryTrace::new());

        let handles = spawn_pool(
            &[
                WorkerBehavior::Prompt,
                WorkerBehavior::Silent,
                WorkerBehavior::Delayed(Duration::from_millis(5)),
            ],
            &sender,
            trace.clone(),
        );
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(transport.try_receive(WorkerId::new(1), HEARTBEAT_TAG).is_some());
        assert!(transport.try_receive(WorkerId::new(2), HEARTBEAT_TAG).is_none());
        assert!(transport.try_receive(WorkerId::new(3), HEARTBEAT_TAG).is_some());
        assert!(transport.try_receive(WorkerId::new(1), HEARTBEAT_TAG).is_none());

        let sent = trace
            .events()
            .into_iter()
            .filter(|e| matches!(e, TraceEvent::HeartbeatSent { .. }))
            .count();
        assert_eq!(sent, 2);
    }
}
