//! Trace view command handlers
//!
//! Handles `pulse processors` and `pulse jobs`, both rebuilt from the run
//! trace.

use anyhow::{Context, Result};
use colored::*;
use pulse_core::dto::job::{JobView, job_views};
use pulse_core::dto::processor::{ProcessorView, processor_views};
use pulse_core::trace::TraceLine;

use crate::config::Config;

async fn read_trace(config: &Config) -> Result<Vec<TraceLine>> {
    let path = &config.trace_path;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read trace {}", path.display()))?;
    Ok(TraceLine::parse_all(&text))
}

/// List processors seen in the trace
pub async fn list_processors(config: &Config) -> Result<()> {
    let processors = processor_views(&read_trace(config).await?);

    if processors.is_empty() {
        println!("{}", "No processor data found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} processor(s):", processors.len()).bold()
    );
    println!();
    for processor in &processors {
        print_processor(processor);
    }

    Ok(())
}

/// List job placements seen in the trace
pub async fn list_jobs(config: &Config) -> Result<()> {
    let jobs = job_views(&read_trace(config).await?);

    if jobs.is_empty() {
        println!("{}", "No job assignments found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} assignment(s):", jobs.len()).bold());
    println!();
    for job in &jobs {
        print_job(job);
    }

    Ok(())
}

fn print_processor(processor: &ProcessorView) {
    let status = if processor.alive {
        "Alive".green()
    } else {
        "Dead".red()
    };
    let jobs = if processor.jobs.is_empty() {
        "None".dimmed().to_string()
    } else {
        processor
            .jobs
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!("  {} Processor #{}", "▸".cyan(), processor.id.to_string().bold());
    println!("    Status:  {}", status);
    println!("    Jobs:    {}", jobs);
    println!();
}

fn print_job(job: &JobView) {
    println!(
        "  Job #{:<3} -> P{:<3} {}",
        job.id,
        job.processor_id,
        job.strategy.as_deref().unwrap_or("N/A").dimmed()
    );
}
