//! Data Transfer Objects for monitoring
//!
//! Views rebuilt from a run trace, served by the monitor API and printed by
//! the CLI. They are plain serializable records with no behaviour of their
//! own beyond construction.

pub mod job;
pub mod processor;
