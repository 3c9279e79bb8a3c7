//! # Domain Entities
//!
//! Collection configuration records as committed to the ledger.

use super::policy::SignaturePolicyEnvelope;
use serde::{Deserialize, Serialize};

/// Per-collection properties beyond identity, membership and peer counts.
///
/// New collection properties land here instead of as extra trait methods
/// on [`crate::ports::Collection`].
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct CollectionCapabilities {
    /// Blocks after which private data is purged (0 = never).
    pub block_to_live: u64,
    /// Only member orgs may read the collection from chaincode.
    pub member_only_read: bool,
    /// Only member orgs may write the collection from chaincode.
    pub member_only_write: bool,
}

impl CollectionCapabilities {
    /// True if private data expires.
    pub fn expires(&self) -> bool {
        self.block_to_live > 0
    }
}

/// Configuration of a single collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Collection name, unique within its namespace.
    pub name: String,
    /// Policy naming the member orgs.
    pub member_orgs_policy: SignaturePolicyEnvelope,
    /// Minimum peers that must receive the data at endorsement.
    pub required_peer_count: u32,
    /// Maximum peers the data is sent to at endorsement.
    pub maximum_peer_count: u32,
    /// Blocks after which private data is purged (0 = never).
    pub block_to_live: u64,
    /// Only member orgs may read.
    pub member_only_read: bool,
    /// Only member orgs may write.
    pub member_only_write: bool,
}

impl CollectionConfig {
    /// Collection open to any member of `orgs`.
    pub fn new<I, S>(name: impl Into<String>, orgs: I, required: u32, maximum: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            member_orgs_policy: SignaturePolicyEnvelope::signed_by_any_member(orgs),
            required_peer_count: required,
            maximum_peer_count: maximum,
            block_to_live: 0,
            member_only_read: false,
            member_only_write: false,
        }
    }

    /// Set the purge horizon.
    pub fn with_block_to_live(mut self, blocks: u64) -> Self {
        self.block_to_live = blocks;
        self
    }

    /// Restrict chaincode reads and writes to member orgs.
    pub fn member_only(mut self, read: bool, write: bool) -> Self {
        self.member_only_read = read;
        self.member_only_write = write;
        self
    }

    /// Capability view of this config.
    pub fn capabilities(&self) -> CollectionCapabilities {
        CollectionCapabilities {
            block_to_live: self.block_to_live,
            member_only_read: self.member_only_read,
            member_only_write: self.member_only_write,
        }
    }
}

/// All collection configs of one namespace at one version.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionConfigPackage {
    /// Collection configs in declaration order.
    pub configs: Vec<CollectionConfig>,
}

impl CollectionConfigPackage {
    /// Build a package from configs.
    pub fn new(configs: Vec<CollectionConfig>) -> Self {
        Self { configs }
    }

    /// Find a collection by name.
    pub fn find(&self, name: &str) -> Option<&CollectionConfig> {
        self.configs.iter().find(|c| c.name == name)
    }

    /// Collection names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configs.iter().map(|c| c.name.as_str())
    }

    /// Number of collections.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// True if no collections are defined.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
