//! # Domain Value Objects
//!
//! Immutable value types: lookup criteria, signed data and MSP identities.

use super::errors::CollectionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId(pub String);

impl TxId {
    /// Wrap a transaction id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one collection instance, optionally pinned to a transaction.
///
/// With `tx_context == None` the latest committed configuration is used.
/// With `Some(tx)` the configuration committed before `tx` is used.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionCriteria {
    /// Namespace (chaincode) name.
    pub namespace: String,
    /// Collection name.
    pub collection: String,
    /// Transaction the lookup is pinned to.
    pub tx_context: Option<TxId>,
}

impl CollectionCriteria {
    /// Criteria resolving against the latest committed configuration.
    pub fn new(namespace: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            collection: collection.into(),
            tx_context: None,
        }
    }

    /// Pin the lookup to a transaction.
    pub fn with_tx(mut self, tx_id: TxId) -> Self {
        self.tx_context = Some(tx_id);
        self
    }

    /// Reject empty names.
    pub fn validate(&self) -> Result<(), CollectionError> {
        if self.namespace.is_empty() {
            return Err(CollectionError::InvalidCriteria(
                "namespace is empty".to_string(),
            ));
        }
        if self.collection.is_empty() {
            return Err(CollectionError::InvalidCriteria(
                "collection name is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Data signed by a peer.
///
/// `identity` is a serialized identity of the signer, `signature` covers
/// `data`. Signature validity is checked before this reaches a filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedData {
    /// Serialized signer identity.
    pub identity: Vec<u8>,
    /// Signed message.
    pub data: Vec<u8>,
    /// Signature over `data`.
    pub signature: Vec<u8>,
}

/// Wire form of a peer identity: MSP id plus opaque certificate bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedIdentity {
    /// Owning MSP.
    pub msp_id: String,
    /// Certificate or public key bytes.
    pub id_bytes: Vec<u8>,
}

/// Role an identity holds inside its MSP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum MspRole {
    /// Any identity issued by the MSP.
    #[default]
    Member,
    /// MSP administrator.
    Admin,
    /// Client identity.
    Client,
    /// Peer identity.
    Peer,
}

/// Deserialized peer identity, as seen by policy evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerIdentity {
    /// Owning MSP.
    pub msp_id: String,
    /// Role within the MSP.
    pub role: MspRole,
}

impl PeerIdentity {
    /// Create an identity.
    pub fn new(msp_id: impl Into<String>, role: MspRole) -> Self {
        Self {
            msp_id: msp_id.into(),
            role,
        }
    }
}
