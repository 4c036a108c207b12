//! Pulse Master
//!
//! The coordinating side of a Pulse cluster.
//!
//! Architecture:
//! - Configuration: run parameters from the environment or defaults
//! - Transport: non-blocking heartbeat channel from the workers
//! - Collector and registry: the bounded liveness window
//! - Scheduler: round-robin and least-connections job placement
//! - Services: the run trace
//! - Repositories: snapshot persistence
//!
//! A run listens for heartbeats for a fixed window, places the job batch on
//! the workers that signalled with both strategies, and commits a status
//! snapshot.
//!
//! # Example
//!
//! ```no_run
//! use pulse_master::{ChannelTransport, FileSnapshotRepository, Master, MasterConfig, TracingTrace};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = MasterConfig::default();
//! let (mut transport, _sender) = ChannelTransport::channel(config.pool_size);
//! let repository = FileSnapshotRepository::new(&config.snapshot_path);
//!
//! let snapshot = Master::new(&config)
//!     .run(&mut transport, &TracingTrace, &repository)
//!     .await?;
//! println!("{} worker(s) alive", snapshot.active_processors.len());
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod master;
pub mod registry;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod transport;
pub mod worker;

// Re-export commonly used types
pub use collector::{CollectorSettings, HeartbeatCollector};
pub use config::MasterConfig;
pub use error::{MasterError, Result};
pub use master::Master;
pub use registry::WorkerRegistry;
pub use repository::{FileSnapshotRepository, SnapshotRepository};
pub use scheduler::{JobScheduler, SchedulerError, StrategyOutcome};
pub use service::{FileTraceSink, MemoryTrace, TraceSink, TracingTrace};
pub use transport::{ChannelTransport, Transport, TransportSender};
pub use worker::{SimulatedWorker, WorkerBehavior, spawn_pool};
