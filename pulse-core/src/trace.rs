//! Run trace
//!
//! The master records a human-readable, append-only trace of each run:
//! which heartbeats arrived and where every job was placed. Each event is
//! one line, prefixed with an RFC 3339 timestamp in brackets:
//!
//! ```text
//! [2026-10-19T08:47:01.512Z] Heartbeat from processor 2
//! [2026-10-19T08:47:06.519Z] Job 1 assigned to processor 2
//! ```
//!
//! The monitor and the CLI rebuild processor and job views by parsing these
//! lines back with [`TraceLine::parse`].

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::job::{Assignment, JobId, StrategyKind};
use crate::domain::worker::WorkerId;

/// Something worth recording during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    MasterStarted,
    ListeningForHeartbeats,
    HeartbeatReceived { worker: WorkerId },
    HeartbeatSent { worker: WorkerId },
    StrategyStarted { strategy: StrategyKind },
    JobAssigned {
        job: JobId,
        worker: WorkerId,
        /// Only reported by the least-connection pass
        least_load: Option<u32>,
    },
    NoWorkersAlive,
    SnapshotFailed { reason: String },
    MasterDone,
}

impl TraceEvent {
    /// Event describing an assignment, shaped by the strategy that made it
    pub fn assigned(assignment: &Assignment) -> Self {
        let least_load = match assignment.strategy {
            StrategyKind::RoundRobin => None,
            StrategyKind::LeastConnection => Some(assignment.prior_load),
        };
        TraceEvent::JobAssigned {
            job: assignment.job,
            worker: assignment.worker,
            least_load,
        }
    }

    /// Parses the message part of a trace line
    pub fn parse(message: &str) -> Option<Self> {
        let message = message.trim();
        match message {
            "Master started" => return Some(TraceEvent::MasterStarted),
            "Master: Listening for heartbeats..." => {
                return Some(TraceEvent::ListeningForHeartbeats);
            }
            "No processors alive; skipping job assignment" => {
                return Some(TraceEvent::NoWorkersAlive);
            }
            "Master done." => return Some(TraceEvent::MasterDone),
            _ => {}
        }

        if let Some(rest) = message.strip_prefix("Heartbeat from processor ") {
            let worker = rest.trim().parse().ok()?;
            return Some(TraceEvent::HeartbeatReceived {
                worker: WorkerId::new(worker),
            });
        }

        if let Some(rest) = message.strip_prefix("Processor ") {
            let worker = rest.strip_suffix(": Sent heartbeat.")?.parse().ok()?;
            return Some(TraceEvent::HeartbeatSent {
                worker: WorkerId::new(worker),
            });
        }

        if let Some(rest) = message.strip_prefix("--- ") {
            let name = rest.strip_suffix(" Job Assignment ---")?;
            return StrategyKind::from_name(name)
                .map(|strategy| TraceEvent::StrategyStarted { strategy });
        }

        if let Some(reason) = message.strip_prefix("Snapshot write failed: ") {
            return Some(TraceEvent::SnapshotFailed {
                reason: reason.to_string(),
            });
        }

        if let Some(rest) = message.strip_prefix("Job ") {
            let (job, rest) = rest.split_once(" assigned to processor ")?;
            let (worker, least_load) = match rest.split_once(" (Least Load: ") {
                Some((worker, load)) => (worker, Some(load.strip_suffix(')')?.parse().ok()?)),
                None => (rest, None),
            };
            return Some(TraceEvent::JobAssigned {
                job: JobId::new(job.parse().ok()?),
                worker: WorkerId::new(worker.parse().ok()?),
                least_load,
            });
        }

        None
    }
}

impl std::fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEvent::MasterStarted => write!(f, "Master started"),
            TraceEvent::ListeningForHeartbeats => write!(f, "Master: Listening for heartbeats..."),
            TraceEvent::HeartbeatReceived { worker } => {
                write!(f, "Heartbeat from processor {}", worker)
            }
            TraceEvent::HeartbeatSent { worker } => write!(f, "Processor {}: Sent heartbeat.", worker),
            TraceEvent::StrategyStarted { strategy } => {
                write!(f, "--- {} Job Assignment ---", strategy)
            }
            TraceEvent::JobAssigned {
                job,
                worker,
                least_load: None,
            } => write!(f, "Job {} assigned to processor {}", job, worker),
            TraceEvent::JobAssigned {
                job,
                worker,
                least_load: Some(load),
            } => write!(
                f,
                "Job {} assigned to processor {} (Least Load: {})",
                job, worker, load
            ),
            TraceEvent::NoWorkersAlive => {
                write!(f, "No processors alive; skipping job assignment")
            }
            TraceEvent::SnapshotFailed { reason } => write!(f, "Snapshot write failed: {}", reason),
            TraceEvent::MasterDone => write!(f, "Master done."),
        }
    }
}

/// One line of a trace file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    pub timestamp: Option<DateTime<Utc>>,
    pub event: TraceEvent,
}

impl TraceLine {
    pub fn now(event: TraceEvent) -> Self {
        Self {
            timestamp: Some(Utc::now()),
            event,
        }
    }

    /// Parses a line, with or without its timestamp prefix
    ///
    /// Returns `None` for blank or unrecognised lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (timestamp, message) = match line.strip_prefix('[').and_then(|l| l.split_once("] ")) {
            Some((stamp, message)) => match DateTime::parse_from_rfc3339(stamp) {
                Ok(ts) => (Some(ts.with_timezone(&Utc)), message),
                Err(_) => (None, line),
            },
            None => (None, line),
        };

        TraceEvent::parse(message).map(|event| TraceLine { timestamp, event })
    }

    /// Parses every recognised line of a trace document
    pub fn parse_all(source: &str) -> Vec<TraceLine> {
        source.lines().filter_map(TraceLine::parse).collect()
    }
}

impl std::fmt::Display for TraceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.timestamp {
            Some(ts) => write!(
                f,
                "[{}] {}",
                ts.to_rfc3339_opts(SecondsFormat::Millis, true),
                self.event
            ),
            None => write!(f, "{}", self.event),
        }
    }
}
