//! Error types for trainer-core.

use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors the engine can reject a call with. A rejected call performs no
/// mutation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid answer grade {0}, expected 0-3")]
    InvalidAnswer(u8),

    #[error("session duration must be at least 1 minute, got {0}")]
    InvalidDuration(u32),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Failure surfaced by a repository backing the engine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),
}
