//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::ArtifactError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ArtifactError> for ApiError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::NotFound(path) => {
                ApiError::NotFound(format!("{} not found", path.display()))
            }
            ArtifactError::Io(path, e) => {
                ApiError::InternalError(format!("Failed to read {}: {}", path.display(), e))
            }
            ArtifactError::Malformed(path, e) => {
                ApiError::InternalError(format!("Malformed snapshot {}: {}", path.display(), e))
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
