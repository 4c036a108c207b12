//! Snapshot repository
//!
//! Persists the status snapshot. A commit replaces the previous document
//! as a whole: the JSON is written to a sibling temporary file which is
//! then renamed over the target, so readers never observe a partial write.

use async_trait::async_trait;
use pulse_core::domain::snapshot::StatusSnapshot;
use std::path::{Path, PathBuf};

use crate::error::{MasterError, Result};

/// Repository trait for snapshot persistence
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Replaces the persisted snapshot
    ///
    /// # Arguments
    /// * `snapshot` - The fully assembled snapshot of a run
    async fn commit(&self, snapshot: &StatusSnapshot) -> Result<()>;
}

/// JSON file implementation of SnapshotRepository
pub struct FileSnapshotRepository {
    path: PathBuf,
}

impl FileSnapshotRepository {
    /// Creates a new file snapshot repository
    ///
    /// # Arguments
    /// * `path` - Location of the JSON document (e.g., "system-state.json")
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotRepository for FileSnapshotRepository {
    async fn commit(&self, snapshot: &StatusSnapshot) -> Result<()> {
        let json = snapshot.to_json()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MasterError::sink_unavailable(parent, e))?;
        }

        let staging = self.staging_path();
        tokio::fs::write(&staging, json)
            .await
            .map_err(|e| MasterError::sink_unavailable(&staging, e))?;

        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(MasterError::sink_unavailable(&self.path, e));
        }

        tracing::debug!("Snapshot committed to {}", self.path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::domain::job::{Assignment, JobId, StrategyKind};
    use pulse_core::domain::snapshot::StrategyReport;
    use pulse_core::domain::worker::{LivenessSet, WorkerId};

    fn assigned_snapshot() -> StatusSnapshot {
        let assignment = |kind| Assignment {
            job: JobId::new(1),
            worker: WorkerId::new(1),
            strategy: kind,
            prior_load: 0,
        };
        StatusSnapshot::assigned(
            LivenessSet::from_ids([WorkerId::new(1)]),
            StrategyReport::new(
                StrategyKind::RoundRobin,
                &[assignment(StrategyKind::RoundRobin)],
                1,
            ),
            StrategyReport::new(
                StrategyKind::LeastConnection,
                &[assignment(StrategyKind::LeastConnection)],
                1,
            ),
        )
    }

    #[tokio::test]
    async fn test_commit_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("system-state.json");
        let repository = FileSnapshotRepository::new(&path);

        repository.commit(&assigned_snapshot()).await.unwrap();
        repository
            .commit(&StatusSnapshot::no_workers_alive())
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let persisted = StatusSnapshot::from_json(&contents).unwrap();
        assert_eq!(persisted, StatusSnapshot::no_workers_alive());
        assert!(!repository.staging_path().exists());
    }

    #[tokio::test]
    async fn test_commit_to_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let repository = FileSnapshotRepository::new(blocker.join("system-state.json"));
        let result = repository.commit(&assigned_snapshot()).await;

        assert!(matches!(result, Err(e) if e.is_sink_unavailable()));
    }

    #[test]
    fn test_staging_path_is_a_sibling() {
        let repository = FileSnapshotRepository::new("/var/lib/pulse/system-state.json");
        assert_eq!(
            repository.staging_path(),
            PathBuf::from("/var/lib/pulse/system-state.json.tmp")
        );
    }
}
