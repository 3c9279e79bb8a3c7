//! # Inbound Ports
//!
//! API traits the endorsement and validation pipelines call into.

use crate::domain::{
    CollectionCapabilities, CollectionConfigPackage, CollectionCriteria, CollectionError,
    SignedData,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Predicate over data signed by a peer.
///
/// Returns true if the signer may receive the collection's private data.
/// The signature is assumed to be verified already; the filter only binds
/// the signer identity to the collection policy.
pub type Filter = Arc<dyn Fn(&SignedData) -> bool + Send + Sync>;

/// Resolved collection: identity and members.
pub trait Collection: Send + Sync {
    /// Collection name.
    fn collection_id(&self) -> &str;

    /// Member orgs as MSP ids, sorted.
    fn member_orgs(&self) -> &[String];

    /// Additional per-collection properties.
    fn capabilities(&self) -> &CollectionCapabilities;
}

/// Resolved access policy of a collection.
pub trait CollectionAccessPolicy: Send + Sync {
    /// Member filter for dissemination targets.
    fn access_filter(&self) -> Filter;

    /// Minimum peers the data must reach at endorsement; endorsement fails
    /// below this.
    fn required_peer_count(&self) -> u32;

    /// Maximum peers the data is sent to at endorsement.
    fn maximum_peer_count(&self) -> u32;

    /// Member orgs as MSP ids, sorted.
    fn member_orgs(&self) -> &[String];

    /// Additional per-collection properties.
    fn capabilities(&self) -> &CollectionCapabilities;
}

/// Collection store - inbound port.
///
/// With a tx id in the criteria, lookups see the configuration committed
/// before that transaction. Without one, or if the ledger does not know
/// the transaction yet, they see the latest committed configuration.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Retrieve a collection.
    async fn retrieve_collection(
        &self,
        criteria: &CollectionCriteria,
    ) -> Result<Arc<dyn Collection>, CollectionError>;

    /// Retrieve a collection's access policy.
    async fn retrieve_collection_access_policy(
        &self,
        criteria: &CollectionCriteria,
    ) -> Result<Arc<dyn CollectionAccessPolicy>, CollectionError>;

    /// Retrieve the namespace config package the collection lives in.
    async fn retrieve_collection_config_package(
        &self,
        criteria: &CollectionCriteria,
    ) -> Result<CollectionConfigPackage, CollectionError>;
}
