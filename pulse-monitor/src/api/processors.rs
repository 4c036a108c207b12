//! Processor and Job API Handlers
//!
//! Views rebuilt from the run trace.

use axum::{Json, extract::State};
use pulse_core::dto::job::JobView;
use pulse_core::dto::processor::ProcessorView;

use crate::api::error::ApiResult;
use crate::service::Artifacts;

/// GET /api/processors
/// Liveness and placed jobs per processor
pub async fn list_processors(
    State(artifacts): State<Artifacts>,
) -> ApiResult<Json<Vec<ProcessorView>>> {
    tracing::debug!("Listing processors");

    let processors = artifacts.processors().await?;
    Ok(Json(processors))
}

/// GET /api/jobs
/// Every job placement, in trace order
pub async fn list_jobs(State(artifacts): State<Artifacts>) -> ApiResult<Json<Vec<JobView>>> {
    tracing::debug!("Listing jobs");

    let jobs = artifacts.jobs().await?;
    Ok(Json(jobs))
}
