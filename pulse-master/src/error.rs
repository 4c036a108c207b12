//! Error types for the master

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for master operations
pub type Result<T> = std::result::Result<T, MasterError>;

/// Errors that stop a run from producing durable output
#[derive(Debug, Error)]
pub enum MasterError {
    /// A sink could not be opened or written
    #[error("sink unavailable at {}: {source}", .path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be encoded
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MasterError {
    pub fn sink_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SinkUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Check if this error came from a sink
    pub fn is_sink_unavailable(&self) -> bool {
        matches!(self, Self::SinkUnavailable { .. })
    }
}
