//! Uniform operation responses.
//!
//! Every public operation resolves to the same envelope instead of
//! letting a domain error escape past the boundary. Callers branch on
//! `success` and present `error` as-is.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// The envelope every dispatched operation returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable error, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed response carrying an error message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, CommerceError>> for ApiResponse<T> {
    fn from(result: Result<T, CommerceError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::err(e.to_string()),
        }
    }
}
