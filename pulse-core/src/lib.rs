//! Pulse Core
//!
//! Core types shared by the Pulse master, monitor and CLI.
//!
//! This crate contains:
//! - Domain types: workers, jobs, assignments and the status snapshot
//! - Trace: the run trace line format and its parser
//! - DTOs: processor and job views derived from a run trace

pub mod domain;
pub mod dto;
pub mod trace;
