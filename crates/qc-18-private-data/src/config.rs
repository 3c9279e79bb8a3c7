//! Configuration for the Private Data Collections subsystem.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Collection store configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionStoreConfig {
    /// Upper bound on a single ledger config lookup (milliseconds).
    pub lookup_timeout_ms: u64,
    /// Longest namespace name accepted in criteria.
    pub max_namespace_len: usize,
}

impl Default for CollectionStoreConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: 5_000,
            max_namespace_len: 256,
        }
    }
}

impl CollectionStoreConfig {
    /// Create config for testing.
    pub fn for_testing() -> Self {
        Self {
            lookup_timeout_ms: 200,
            max_namespace_len: 64,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_COLLECTION_LOOKUP_TIMEOUT_MS`: lookup timeout (default: 5000)
    /// - `QC_COLLECTION_MAX_NAMESPACE_LEN`: namespace length limit (default: 256)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            lookup_timeout_ms: env::var("QC_COLLECTION_LOOKUP_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.lookup_timeout_ms),
            max_namespace_len: env::var("QC_COLLECTION_MAX_NAMESPACE_LEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_namespace_len),
        }
    }

    /// Lookup timeout as a `Duration`.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}
