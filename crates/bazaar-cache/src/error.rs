//! Cache error types.

use thiserror::Error;

/// Errors that can occur in the query cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
