//! # QC-18 Private Data Collections
//!
//! Resolution of private data collection configs and dissemination access
//! filters.
//!
//! **Subsystem ID:** 18  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Given a namespace (chaincode) and collection name, resolve the collection
//! config in effect for a transaction and derive:
//! - the collection's member orgs,
//! - a filter deciding which signed peer identities may receive its
//!   private data,
//! - the required/maximum dissemination peer counts endorsement relies on.
//!
//! ## As-of-Transaction Resolution
//!
//! | Criteria `tx_context` | Config version used |
//! |-----------------------|---------------------|
//! | `None` | latest committed |
//! | `Some(tx)`, tx committed | last version committed before `tx` |
//! | `Some(tx)`, tx unknown | latest committed |
//!
//! Re-validation of a historical transaction therefore sees exactly the
//! config it was simulated against, regardless of later upgrades.
//!
//! ## Errors
//!
//! | Error | Meaning | Retry |
//! |-------|---------|-------|
//! | `NotFound` / `NamespaceNotFound` | absent at resolved version | no |
//! | `StorageUnavailable` | ledger lookup failed or timed out | yes |
//! | `MalformedConfig` | committed config breaks an invariant | no |
//!
//! ## Module Structure
//!
//! ```text
//! qc-18-private-data/
//! ├── domain/          # Criteria, configs, policies, KVS keys, invariants
//! ├── ports/           # CollectionStore API + ConfigHistory/IdentityDeserializer
//! ├── adapters/        # In-memory config history, serialized identities
//! └── application/     # SimpleCollection views, SimpleCollectionStore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{serialize_identity, InMemoryConfigHistory, SerializedIdentityDeserializer};
pub use application::{SimpleCollection, SimpleCollectionStore};
pub use config::CollectionStoreConfig;
pub use domain::{
    build_collection_key, invariant_collection_name, invariant_peer_counts, parse_collection_key,
    validate_collection_config, validate_config_package, CollectionCapabilities, CollectionConfig,
    CollectionConfigPackage, CollectionCriteria, CollectionError, CompiledPolicy, IdentityError,
    LedgerError, MspPrincipal, MspRole, PeerIdentity, PolicyError, SerializedIdentity,
    SignaturePolicy, SignaturePolicyEnvelope, SignedData, TxId, COLLECTION_SEPARATOR,
    COLLECTION_SUFFIX, MAX_COLLECTION_NAME_LEN,
};
pub use ports::{
    Collection, CollectionAccessPolicy, CollectionStore, ConfigHistory, Filter,
    IdentityDeserializer, MockConfigHistory,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
