//! Status command handler
//!
//! Prints the latest status snapshot.

use anyhow::{Context, Result};
use colored::*;
use pulse_core::domain::snapshot::{StatusSnapshot, StrategyReport};

use crate::config::Config;

/// Handle `pulse status`
pub async fn handle_status_command(config: &Config) -> Result<()> {
    let path = &config.snapshot_path;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;

    let snapshot = StatusSnapshot::from_json(&text)
        .with_context(|| format!("Malformed snapshot {}", path.display()))?;

    print_snapshot(&snapshot);
    Ok(())
}

/// Print a snapshot
pub fn print_snapshot(snapshot: &StatusSnapshot) {
    if !snapshot.has_assignments() {
        let reason = snapshot.error.as_deref().unwrap_or("no assignments recorded");
        println!("{}", format!("No jobs assigned: {}", reason).red().bold());
        return;
    }

    let active: Vec<String> = snapshot
        .active_processors
        .iter()
        .map(|id| format!("P{}", id))
        .collect();
    println!(
        "{} {}",
        "Active processors:".bold(),
        active.join(", ").green()
    );
    println!();

    for report in snapshot.reports() {
        print_report(report);
    }
}

fn print_report(report: &StrategyReport) {
    println!(
        "  {} {} {}",
        "▸".cyan(),
        report.strategy.bold(),
        format!("(total load: {})", report.total_load).dimmed()
    );
    for assignment in &report.job_assignments {
        println!("    {}", assignment);
    }
    println!();
}
