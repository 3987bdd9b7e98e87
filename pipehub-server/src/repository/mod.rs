//! Repository Module
//!
//! Data access layer for the registry.
//! Each repository handles database operations for a specific domain entity.

pub mod pipe;
pub mod version;

// Re-export for convenience
pub use pipe as pipe_repository;
pub use version as version_repository;
