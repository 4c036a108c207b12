//! Service layer
//!
//! Services the master uses while a run is in progress. They are
//! trait-based so the collector and scheduler can be exercised with
//! in-memory implementations.

mod trace;

// Re-export traits
pub use trace::TraceSink;

// Re-export implementations
pub use trace::{FileTraceSink, MemoryTrace, TracingTrace};
