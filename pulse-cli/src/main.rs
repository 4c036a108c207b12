//! Pulse CLI
//!
//! Runs a coordination round against a simulated worker pool and inspects
//! the artifacts it leaves behind.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Pulse cluster coordinator", long_about = None)]
struct Cli {
    /// Status snapshot location
    #[arg(
        long,
        global = true,
        env = "PULSE_SNAPSHOT_PATH",
        default_value = "system-state.json"
    )]
    snapshot_path: PathBuf,

    /// Run trace location
    #[arg(
        long,
        global = true,
        env = "PULSE_TRACE_PATH",
        default_value = "logs/pulse.log"
    )]
    trace_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse=info,pulse_master=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        snapshot_path: cli.snapshot_path,
        trace_path: cli.trace_path,
    };

    handle_command(cli.command, &config).await
}
