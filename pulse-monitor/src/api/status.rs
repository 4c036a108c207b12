//! Status API Handler

use axum::{Json, extract::State};
use pulse_core::domain::snapshot::StatusSnapshot;

use crate::api::error::ApiResult;
use crate::service::Artifacts;

/// GET /api/status
/// Latest committed status snapshot
pub async fn get_status(State(artifacts): State<Artifacts>) -> ApiResult<Json<StatusSnapshot>> {
    tracing::debug!("Reading status snapshot");

    let snapshot = artifacts.snapshot().await?;
    Ok(Json(snapshot))
}
