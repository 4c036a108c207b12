//! Master configuration
//!
//! Defines the run parameters of a coordination run: pool size, job batch,
//! liveness window timing and where the snapshot and trace are written.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Master configuration
///
/// Every value is fixed for the duration of a run.
#[derive(Debug, Clone)]
pub struct MasterConfig {
    /// Number of workers in the pool (W); worker identities are 1..=W
    pub pool_size: u32,

    /// Number of jobs to distribute (J); job identities are 1..=J
    pub job_count: u32,

    /// Length of the liveness window
    pub window: Duration,

    /// Pause between two heartbeat sweeps
    pub sweep_interval: Duration,

    /// Close the window as soon as every worker of the pool has reported
    pub early_exit: bool,

    /// Where the status snapshot is written
    pub snapshot_path: PathBuf,

    /// Where the run trace is appended
    pub trace_path: PathBuf,
}

impl MasterConfig {
    /// Creates a new configuration with defaults
    pub fn new(pool_size: u32, job_count: u32) -> Self {
        Self {
            pool_size,
            job_count,
            window: Duration::from_secs(5),
            sweep_interval: Duration::from_secs(1),
            early_exit: false,
            snapshot_path: PathBuf::from("system-state.json"),
            trace_path: PathBuf::from("logs/pulse.log"),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - PULSE_POOL_SIZE (default: 4)
    /// - PULSE_JOB_COUNT (default: 8)
    /// - PULSE_WINDOW_SECS (default: 5)
    /// - PULSE_SWEEP_INTERVAL_MS (default: 1000)
    /// - PULSE_EARLY_EXIT (default: false)
    /// - PULSE_SNAPSHOT_PATH (default: system-state.json)
    /// - PULSE_TRACE_PATH (default: logs/pulse.log)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates configuration from an arbitrary variable lookup
    ///
    /// Unset variables fall back to the defaults; a set but unparsable
    /// variable is an error naming the variable.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let pool_size = parse_var(&lookup, "PULSE_POOL_SIZE", defaults.pool_size)?;
        let job_count = parse_var(&lookup, "PULSE_JOB_COUNT", defaults.job_count)?;
        let window = parse_var(&lookup, "PULSE_WINDOW_SECS", defaults.window.as_secs())
            .map(Duration::from_secs)?;
        let sweep_interval = parse_var(
            &lookup,
            "PULSE_SWEEP_INTERVAL_MS",
            defaults.sweep_interval.as_millis() as u64,
        )
        .map(Duration::from_millis)?;
        let early_exit = parse_var(&lookup, "PULSE_EARLY_EXIT", defaults.early_exit)?;

        let snapshot_path = lookup("PULSE_SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.snapshot_path);

        let trace_path = lookup("PULSE_TRACE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.trace_path);

        Ok(Self {
            pool_size,
            job_count,
            window,
            sweep_interval,
            early_exit,
            snapshot_path,
            trace_path,
        })
    }

    pub fn with_window(mut self, window: Duration, sweep_interval: Duration) -> Self {
        self.window = window;
        self.sweep_interval = sweep_interval;
        self
    }

    pub fn with_early_exit(mut self, early_exit: bool) -> Self {
        self.early_exit = early_exit;
        self
    }

    pub fn with_paths(mut self, snapshot_path: PathBuf, trace_path: PathBuf) -> Self {
        self.snapshot_path = snapshot_path;
        self.trace_path = trace_path;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.pool_size == 0 {
            anyhow::bail!("pool_size must be greater than 0");
        }

        if self.job_count == 0 {
            anyhow::bail!("job_count must be greater than 0");
        }

        if self.window.is_zero() {
            anyhow::bail!("window must be greater than 0");
        }

        if self.sweep_interval.is_zero() {
            anyhow::bail!("sweep_interval must be greater than 0");
        }

        if self.sweep_interval > self.window {
            anyhow::bail!("sweep_interval cannot exceed the liveness window");
        }

        if self.snapshot_path.as_os_str().is_empty() {
            anyhow::bail!("snapshot_path cannot be empty");
        }

        if self.trace_path.as_os_str().is_empty() {
            anyhow::bail!("trace_path cannot be empty");
        }

        Ok(())
    }
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self::new(4, 8)
    }
}

/// Looks up and parses a variable, falling back when it is unset
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {} ({})", name, raw, e)),
        None => Ok(default),
    }
}
