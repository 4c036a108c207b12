//! Core domain types
//!
//! This module contains the structures that describe a single coordination
//! run. They are produced by the master and consumed by the monitor and CLI.

pub mod job;
pub mod snapshot;
pub mod worker;
