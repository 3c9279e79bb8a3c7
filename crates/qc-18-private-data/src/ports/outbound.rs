//! # Outbound Ports
//!
//! Traits for external dependencies (ledger config history, membership).

use crate::domain::{CollectionConfigPackage, IdentityError, LedgerError, PeerIdentity, TxId};
use async_trait::async_trait;
use std::time::Duration;

/// Versioned collection config history - outbound port.
///
/// Implementations must serve snapshot-consistent reads: a package is
/// returned whole, as committed.
#[async_trait]
pub trait ConfigHistory: Send + Sync {
    /// Config package of `namespace`.
    ///
    /// - `tx == None`: latest committed version.
    /// - `tx == Some(t)`: version committed strictly before `t`. If `t` is
    ///   not on the ledger, the latest committed version.
    ///
    /// `Ok(None)` means the namespace has no collection config at that point.
    async fn get_config_as_of(
        &self,
        namespace: &str,
        tx: Option<&TxId>,
    ) -> Result<Option<CollectionConfigPackage>, LedgerError>;
}

/// Membership service - outbound port.
pub trait IdentityDeserializer: Send + Sync {
    /// Decode serialized identity bytes.
    fn deserialize(&self, identity: &[u8]) -> Result<PeerIdentity, IdentityError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock config history returning a fixed answer.
#[derive(Clone, Default)]
pub struct MockConfigHistory {
    /// Package returned on success.
    pub package: Option<CollectionConfigPackage>,
    /// Error returned instead, if set.
    pub failure: Option<LedgerError>,
    /// Artificial latency before answering.
    pub delay: Option<Duration>,
}

impl MockConfigHistory {
    /// History that always returns `package`.
    pub fn with_package(package: CollectionConfigPackage) -> Self {
        Self {
            package: Some(package),
            ..Default::default()
        }
    }

    /// History that always fails with `failure`.
    pub fn failing(failure: LedgerError) -> Self {
        Self {
            failure: Some(failure),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ConfigHistory for MockConfigHistory {
    async fn get_config_as_of(
        &self,
        _namespace: &str,
        _tx: Option<&TxId>,
    ) -> Result<Option<CollectionConfigPackage>, LedgerError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.package.clone()),
        }
    }
}
