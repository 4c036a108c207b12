//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod run;
mod status;
mod views;

pub use run::RunArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run one coordination round against simulated workers
    Run(RunArgs),
    /// Show the latest status snapshot
    Status,
    /// Show processor liveness and jobs from the run trace
    Processors,
    /// Show job placements from the run trace
    Jobs,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run(args) => run::handle_run_command(args, config).await,
        Commands::Status => status::handle_status_command(config).await,
        Commands::Processors => views::list_processors(config).await,
        Commands::Jobs => views::list_jobs(config).await,
    }
}
