//! Run command handler
//!
//! Spawns a simulated worker pool, runs the master against it and prints
//! the resulting snapshot.

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use pulse_master::{
    ChannelTransport, FileSnapshotRepository, FileTraceSink, Master, MasterConfig, TraceSink,
    TracingTrace, WorkerBehavior, spawn_pool,
};
use std::sync::Arc;
use std::time::Duration;

use crate::commands::status::print_snapshot;
use crate::config::Config;

/// Arguments of `pulse run`
///
/// Every value defaults to the `PULSE_*` environment configuration; flags
/// given here override it.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Number of workers in the pool [env: PULSE_POOL_SIZE, default: 4]
    #[arg(long)]
    workers: Option<u32>,

    /// Number of jobs to distribute [env: PULSE_JOB_COUNT, default: 8]
    #[arg(long)]
    jobs: Option<u32>,

    /// Length of the liveness window, in seconds [env: PULSE_WINDOW_SECS, default: 5]
    #[arg(long)]
    window_secs: Option<u64>,

    /// Pause between heartbeat sweeps, in milliseconds
    /// [env: PULSE_SWEEP_INTERVAL_MS, default: 1000]
    #[arg(long)]
    sweep_interval_ms: Option<u64>,

    /// Close the window as soon as every worker has reported [env: PULSE_EARLY_EXIT]
    #[arg(long)]
    early_exit: bool,

    /// Worker behavior override as <id>=<prompt|silent|delayed:MILLIS>
    /// (repeatable; unlisted workers are prompt)
    #[arg(long = "behavior", value_name = "ID=BEHAVIOR")]
    behaviors: Vec<String>,
}

impl RunArgs {
    /// Applies the flags on top of a base configuration
    fn apply(&self, base: MasterConfig, config: &Config) -> MasterConfig {
        let mut master_config =
            base.with_paths(config.snapshot_path.clone(), config.trace_path.clone());

        if let Some(workers) = self.workers {
            master_config.pool_size = workers;
        }
        if let Some(jobs) = self.jobs {
            master_config.job_count = jobs;
        }
        if let Some(secs) = self.window_secs {
            master_config.window = Duration::from_secs(secs);
        }
        if let Some(millis) = self.sweep_interval_ms {
            master_config.sweep_interval = Duration::from_millis(millis);
        }
        if self.early_exit {
            master_config.early_exit = true;
        }

        master_config
    }
}

/// Handle `pulse run`
pub async fn handle_run_command(args: RunArgs, config: &Config) -> Result<()> {
    let master_config = args.apply(MasterConfig::from_env()?, config);
    master_config.validate()?;

    let behaviors = resolve_behaviors(master_config.pool_size, &args.behaviors)?;
    let trace = open_trace(&master_config);

    println!(
        "{}",
        format!(
            "Listening for {} worker(s) for {:?}...",
            master_config.pool_size, master_config.window
        )
        .bold()
    );

    let (mut transport, sender) = ChannelTransport::channel(master_config.pool_size);
    let workers = spawn_pool(&behaviors, &sender, Arc::clone(&trace));
    drop(sender);

    let repository = FileSnapshotRepository::new(&master_config.snapshot_path);
    let result = Master::new(&master_config)
        .run(&mut transport, trace.as_ref(), &repository)
        .await;

    // Workers still waiting to signal missed the window
    for worker in workers {
        worker.abort();
    }

    let snapshot = result.context("Run did not produce a durable snapshot")?;

    println!();
    print_snapshot(&snapshot);
    println!(
        "{}",
        format!("Snapshot written to {}", repository.path().display()).dimmed()
    );

    Ok(())
}

/// Opens the trace file, falling back to console-only tracing
fn open_trace(config: &MasterConfig) -> Arc<dyn TraceSink> {
    match FileTraceSink::open(&config.trace_path) {
        Ok(sink) => {
            tracing::debug!("Appending trace to {}", sink.path().display());
            Arc::new(sink)
        }
        Err(e) => {
            tracing::error!("Trace file unavailable, tracing to console only: {}", e);
            Arc::new(TracingTrace)
        }
    }
}

/// Expands `<id>=<behavior>` overrides into one behavior per worker
fn resolve_behaviors(pool_size: u32, overrides: &[String]) -> Result<Vec<WorkerBehavior>> {
    let mut behaviors = vec![WorkerBehavior::Prompt; pool_size as usize];

    for entry in overrides {
        let (id, behavior) = entry
            .split_once('=')
            .with_context(|| format!("Expected <id>=<behavior>, got '{}'", entry))?;

        let id: u32 = id
            .trim()
            .parse()
            .with_context(|| format!("Invalid worker id in '{}'", entry))?;
        if id == 0 || id > pool_size {
            anyhow::bail!("Worker {} is outside the pool of {}", id, pool_size);
        }

        behaviors[id as usize - 1] = behavior.parse().map_err(anyhow::Error::msg)?;
    }

    Ok(behaviors)
}
