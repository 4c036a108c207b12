//! Log API Handler

use axum::extract::State;

use crate::api::error::ApiResult;
use crate::service::Artifacts;

/// GET /api/logs
/// Raw trace text
pub async fn get_logs(State(artifacts): State<Artifacts>) -> ApiResult<String> {
    let text = artifacts.trace_text().await?;
    Ok(text)
}
