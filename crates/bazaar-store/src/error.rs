//! Store error types.

use thiserror::Error;

/// Errors that can occur in the transactional store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Timed out waiting for the writer gate.
    #[error("timed out after {0}ms waiting for a write transaction slot")]
    Timeout(u64),

    /// A row that a transaction depends on is missing.
    #[error("row not found: {0}")]
    RowNotFound(String),

    /// A uniqueness constraint was violated.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
}

impl StoreError {
    /// Whether the caller may retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Timeout(_))
    }
}
