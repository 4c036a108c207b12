//! Configuration module
//!
//! Handles CLI configuration shared by every command.

use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the status snapshot
    pub snapshot_path: PathBuf,

    /// Location of the run trace
    pub trace_path: PathBuf,
}
