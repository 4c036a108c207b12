//! Pulse Monitor
//!
//! Read-only HTTP view over the artifacts of the latest coordination run:
//! the trace written by the master and the status snapshot it committed.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod service;

use crate::service::Artifacts;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_monitor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pulse Monitor...");

    let trace_path = std::env::var("PULSE_TRACE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("logs/pulse.log"));

    let snapshot_path = std::env::var("PULSE_SNAPSHOT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("system-state.json"));

    tracing::info!(
        "Serving trace {} and snapshot {}",
        trace_path.display(),
        snapshot_path.display()
    );

    // Build router with all API endpoints
    let app = api::create_router(Artifacts::new(trace_path, snapshot_path));

    // Get bind address
    let addr =
        std::env::var("PULSE_MONITOR_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
