//! Error types for conduit-core

use thiserror::Error;

/// Result type alias using conduit-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the storage layer.
///
/// Remote calls have their own [`crate::api::ApiError`]; the dispatchers turn
/// those into state, so they never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
