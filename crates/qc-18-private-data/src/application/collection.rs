//! Simple Collection
//!
//! Resolved view over one `CollectionConfig`, serving both the
//! `Collection` and `CollectionAccessPolicy` ports.

use crate::domain::{
    validate_collection_config, CollectionCapabilities, CollectionConfig, CollectionError,
    CompiledPolicy, SignedData,
};
use crate::ports::inbound::{Collection, CollectionAccessPolicy, Filter};
use crate::ports::outbound::IdentityDeserializer;
use std::slice;
use std::sync::Arc;
use tracing::trace;

/// Collection resolved from a committed config.
///
/// Built once per retrieval and never mutated afterwards.
pub struct SimpleCollection {
    name: String,
    policy: Arc<CompiledPolicy>,
    required_peer_count: u32,
    maximum_peer_count: u32,
    capabilities: CollectionCapabilities,
    deserializer: Arc<dyn IdentityDeserializer>,
}

impl SimpleCollection {
    /// Validate `config` and compile its member-org policy.
    pub fn setup(
        config: &CollectionConfig,
        deserializer: Arc<dyn IdentityDeserializer>,
    ) -> Result<Self, CollectionError> {
        let policy = validate_collection_config(config)?;

        Ok(Self {
            name: config.name.clone(),
            policy: Arc::new(policy),
            required_peer_count: config.required_peer_count,
            maximum_peer_count: config.maximum_peer_count,
            capabilities: config.capabilities(),
            deserializer,
        })
    }
}

impl Collection for SimpleCollection {
    fn collection_id(&self) -> &str {
        &self.name
    }

    fn member_orgs(&self) -> &[String] {
        self.policy.member_orgs()
    }

    fn capabilities(&self) -> &CollectionCapabilities {
        &self.capabilities
    }
}

impl CollectionAccessPolicy for SimpleCollection {
    fn access_filter(&self) -> Filter {
        let policy = Arc::clone(&self.policy);
        let deserializer = Arc::clone(&self.deserializer);
        let collection = self.name.clone();

        Arc::new(move |signed: &SignedData| {
            match deserializer.deserialize(&signed.identity) {
                Ok(identity) => policy.evaluate(slice::from_ref(&identity)),
                Err(e) => {
                    trace!(collection = %collection, error = %e, "Rejecting undecodable identity");
                    false
                }
            }
        })
    }

    fn required_peer_count(&self) -> u32 {
        self.required_peer_count
    }

    fn maximum_peer_count(&self) -> u32 {
        self.maximum_peer_count
    }

    fn member_orgs(&self) -> &[String] {
        self.policy.member_orgs()
    }

    fn capabilities(&self) -> &CollectionCapabilities {
        &self.capabilities
    }
}
