//! Commerce configuration.

use bazaar_store::StoreConfig;
use serde::{Deserialize, Serialize};

/// Tuning knobs for the commerce services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceConfig {
    /// Store configuration (writer-gate wait bound, poll interval).
    pub store: StoreConfig,
    /// Overall checkout deadline in milliseconds. A timed-out attempt
    /// is not retried once this has passed.
    pub txn_timeout_ms: u64,
    /// How many times a timed-out transaction is retried.
    pub txn_retries: u32,
    /// Backoff between transaction retries, in milliseconds.
    pub retry_backoff_ms: u64,
    /// Default listing page size.
    pub default_page_size: i64,
    /// Maximum listing page size.
    pub max_page_size: i64,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            txn_timeout_ms: 20_000,
            txn_retries: 1,
            retry_backoff_ms: 250,
            default_page_size: 24,
            max_page_size: 100,
        }
    }
}
