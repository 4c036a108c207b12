//! Repository layer
//!
//! Repositories persist what a run produced. They carry no business logic:
//! the snapshot is fully assembled before it reaches them.
//!
//! All repositories are trait-based to enable testing and mocking.

mod snapshot;

// Re-export traits
pub use snapshot::SnapshotRepository;

// Re-export implementations
pub use snapshot::FileSnapshotRepository;
