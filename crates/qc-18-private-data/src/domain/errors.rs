//! # Domain Errors
//!
//! Error types for the Private Data Collections subsystem.
//!
//! Three outcomes matter to callers of the store:
//! - absence (`NotFound`, `NamespaceNotFound`) is expected and never retried,
//! - `StorageUnavailable` is transient and may be retried,
//! - `MalformedConfig` is fatal and points at the config-writing code.

use thiserror::Error;

/// Collection store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Criteria rejected before any ledger access.
    #[error("Invalid collection criteria: {0}")]
    InvalidCriteria(String),

    /// Namespace has no collection configuration at the resolved version.
    #[error("No collection configuration for namespace {0}")]
    NamespaceNotFound(String),

    /// Collection is not defined in the resolved configuration.
    #[error("Collection {namespace}/{collection} not found")]
    NotFound {
        /// Namespace (chaincode) name
        namespace: String,
        /// Collection name
        collection: String,
    },

    /// Underlying ledger lookup failed.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Stored configuration violates an invariant.
    #[error("Malformed collection config: {0}")]
    MalformedConfig(String),
}

impl CollectionError {
    /// True for both namespace and collection absence.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NamespaceNotFound(_))
    }

    /// True only for transient storage failures.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

/// Errors reported by the ledger configuration history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Backend could not serve the read.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// A stored blob could not be decoded.
    #[error("Corrupted config blob at key {key}: {reason}")]
    Corrupted {
        /// Persistence key of the blob
        key: String,
        /// Decoder message
        reason: String,
    },

    /// Lookup did not complete in time.
    #[error("Ledger lookup timed out after {0}ms")]
    Timeout(u64),

    /// Write rejected (e.g. invalid package, duplicate tx).
    #[error("Ledger write rejected: {0}")]
    Rejected(String),
}

impl From<LedgerError> for CollectionError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Corrupted { .. } => CollectionError::MalformedConfig(err.to_string()),
            other => CollectionError::StorageUnavailable(other.to_string()),
        }
    }
}

/// Errors raised while turning identity bytes into a peer identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Bytes are not a serialized identity.
    #[error("Cannot deserialize identity: {0}")]
    Malformed(String),

    /// Identity carries no MSP id.
    #[error("Identity has empty MSP id")]
    EmptyMspId,

    /// MSP is not part of the channel.
    #[error("Unknown MSP: {0}")]
    UnknownMsp(String),
}

/// Errors raised while compiling a signature policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Policy lists no principals.
    #[error("Policy has no identities")]
    NoIdentities,

    /// `SignedBy` refers past the end of the principal list.
    #[error("SignedBy index {index} out of range ({len} identities)")]
    IndexOutOfRange {
        /// Referenced index
        index: usize,
        /// Number of principals
        len: usize,
    },

    /// `NOutOf` can never be satisfied.
    #[error("NOutOf requires {n} of {rules} rules")]
    Unsatisfiable {
        /// Required count
        n: usize,
        /// Available sub-rules
        rules: usize,
    },

    /// Principal with an empty MSP id.
    #[error("Principal {0} has empty MSP id")]
    EmptyMspId(usize),

    /// `NOutOf` with a zero threshold, satisfied by anyone.
    #[error("NOutOf threshold of 0 admits every signer")]
    Vacuous,

    /// Rule tree nested at or past the depth limit.
    #[error("Policy nested {0} or more levels deep")]
    TooDeep(usize),
}

impl From<PolicyError> for CollectionError {
    fn from(err: PolicyError) -> Self {
        CollectionError::MalformedConfig(err.to_string())
    }
}
