//! Service Module
//!
//! Reads the run artifacts from disk and turns them into views. The files
//! are re-read on every call, so the monitor always reflects the latest run.

use pulse_core::domain::snapshot::StatusSnapshot;
use pulse_core::dto::job::{JobView, job_views};
use pulse_core::dto::processor::{ProcessorView, processor_views};
use pulse_core::trace::TraceLine;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Service error type
#[derive(Debug)]
pub enum ArtifactError {
    NotFound(PathBuf),
    Io(PathBuf, std::io::Error),
    Malformed(PathBuf, serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Locations of the run artifacts
#[derive(Debug, Clone)]
pub struct Artifacts {
    inner: Arc<Paths>,
}

#[derive(Debug)]
struct Paths {
    trace: PathBuf,
    snapshot: PathBuf,
}

impl Artifacts {
    pub fn new(trace: PathBuf, snapshot: PathBuf) -> Self {
        Self {
            inner: Arc::new(Paths { trace, snapshot }),
        }
    }

    /// Raw trace text
    pub async fn trace_text(&self) -> Result<String> {
        read(&self.inner.trace).await
    }

    /// Per-processor status derived from the trace
    pub async fn processors(&self) -> Result<Vec<ProcessorView>> {
        let text = self.trace_text().await?;
        Ok(processor_views(&TraceLine::parse_all(&text)))
    }

    /// Job placements derived from the trace
    pub async fn jobs(&self) -> Result<Vec<JobView>> {
        let text = self.trace_text().await?;
        Ok(job_views(&TraceLine::parse_all(&text)))
    }

    /// Whether the trace and the snapshot exist, in that order
    pub async fn presence(&self) -> (bool, bool) {
        (
            exists(&self.inner.trace).await,
            exists(&self.inner.snapshot).await,
        )
    }

    /// Latest committed snapshot
    pub async fn snapshot(&self) -> Result<StatusSnapshot> {
        let path = &self.inner.snapshot;
        let text = read(path).await?;
        StatusSnapshot::from_json(&text).map_err(|e| ArtifactError::Malformed(path.clone(), e))
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound(path.to_path_buf())
        } else {
            ArtifactError::Io(path.to_path_buf(), e)
        }
    })
}
