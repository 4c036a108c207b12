//! Health endpoint
//!
//! The monitor is healthy as long as it serves; the body also says which
//! run artifacts are currently on disk.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::service::Artifacts;

/// GET /health
pub async fn health_check(State(artifacts): State<Artifacts>) -> Json<Value> {
    let (trace, snapshot) = artifacts.presence().await;
    Json(json!({
        "status": "ok",
        "trace": trace,
        "snapshot": snapshot,
    }))
}
