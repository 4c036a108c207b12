//! Trace sink service
//!
//! Records the run trace. The sink is handed to the collector and the
//! scheduler by reference, so both stay testable without touching disk.

use pulse_core::trace::{TraceEvent, TraceLine};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{MasterError, Result};

/// Service for recording trace events
///
/// Recording never fails from the caller's point of view: a sink that
/// cannot write reports the problem through `tracing` and carries on.
pub trait TraceSink: Send + Sync {
    /// Records one event
    ///
    /// # Arguments
    /// * `event` - The event to record
    fn record(&self, event: TraceEvent);
}

/// Appends timestamped lines to a file
pub struct FileTraceSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileTraceSink {
    /// Opens the trace file for appending, creating it and its directory
    ///
    /// # Arguments
    /// * `path` - Location of the trace file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| MasterError::sink_unavailable(parent, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| MasterError::sink_unavailable(&path, e))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceSink for FileTraceSink {
    fn record(&self, event: TraceEvent) {
        tracing::info!("{}", event);

        let line = TraceLine::now(event);
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("Failed to lock trace file: {}", e);
                return;
            }
        };
        if let Err(e) = writeln!(file, "{}", line) {
            tracing::error!("Failed to write trace to {}: {}", self.path.display(), e);
        }
    }
}

/// Forwards events to `tracing` only
///
/// Used when the trace file cannot be opened.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTrace;

impl TraceSink for TracingTrace {
    fn record(&self, event: TraceEvent) {
        tracing::info!("{}", event);
    }
}

/// In-memory trace
#[derive(Default)]
pub struct MemoryTrace {
    buffer: Mutex<Vec<TraceLine>>,
}

impl MemoryTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the buffered lines
    pub fn drain(&self) -> Vec<TraceLine> {
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.drain(..).collect()
    }

    /// Copies the buffered events
    pub fn events(&self) -> Vec<TraceEvent> {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.iter().map(|line| line.event.clone()).collect()
    }
}

impl TraceSink for MemoryTrace {
    fn record(&self, event: TraceEvent) {
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.push(TraceLine::now(event));
    }
}
