//! API Module
//!
//! HTTP API layer for the monitor.
//! Each submodule handles endpoints for a specific view.

pub mod error;
pub mod health;
pub mod logs;
pub mod processors;
pub mod status;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::service::Artifacts;

/// Create the main API router with all endpoints
pub fn create_router(artifacts: Artifacts) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Trace views
        .route("/api/processors", get(processors::list_processors))
        .route("/api/jobs", get(processors::list_jobs))
        .route("/api/logs", get(logs::get_logs))
        // Snapshot
        .route("/api/status", get(status::get_status))
        // Add state and middleware
        .with_state(artifacts)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
