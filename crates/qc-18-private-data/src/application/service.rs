//! Collection Store Service
//!
//! Main service implementing `CollectionStore`.

use crate::application::collection::SimpleCollection;
use crate::config::CollectionStoreConfig;
use crate::domain::{
    validate_config_package, CollectionConfig, CollectionConfigPackage, CollectionCriteria,
    CollectionError, LedgerError,
};
use crate::ports::inbound::{Collection, CollectionAccessPolicy, CollectionStore};
use crate::ports::outbound::{ConfigHistory, IdentityDeserializer};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Collection store over a versioned config history.
///
/// Resolution pipeline:
/// 1. Validate criteria
/// 2. Fetch the package as of the criteria's tx (bounded by the lookup timeout)
/// 3. Find the named collection
/// 4. Build the requested view
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct SimpleCollectionStore {
    history: Arc<dyn ConfigHistory>,
    deserializer: Arc<dyn IdentityDeserializer>,
    config: CollectionStoreConfig,
}

impl SimpleCollectionStore {
    /// Create a store with default config.
    pub fn new(
        history: Arc<dyn ConfigHistory>,
        deserializer: Arc<dyn IdentityDeserializer>,
    ) -> Self {
        Self::with_config(history, deserializer, CollectionStoreConfig::default())
    }

    /// Create a store with custom config.
    pub fn with_config(
        history: Arc<dyn ConfigHistory>,
        deserializer: Arc<dyn IdentityDeserializer>,
        config: CollectionStoreConfig,
    ) -> Self {
        Self {
            history,
            deserializer,
            config,
        }
    }

    /// Store configuration.
    pub fn config(&self) -> &CollectionStoreConfig {
        &self.config
    }

    fn validate_criteria(&self, criteria: &CollectionCriteria) -> Result<(), CollectionError> {
        criteria.validate()?;
        if criteria.namespace.len() > self.config.max_namespace_len {
            return Err(CollectionError::InvalidCriteria(format!(
                "namespace length {} exceeds {}",
                criteria.namespace.len(),
                self.config.max_namespace_len
            )));
        }
        Ok(())
    }

    /// Fetch the namespace package as of the criteria's tx context.
    async fn resolve_package(
        &self,
        criteria: &CollectionCriteria,
    ) -> Result<CollectionConfigPackage, CollectionError> {
        self.validate_criteria(criteria)?;

        let lookup = self
            .history
            .get_config_as_of(&criteria.namespace, criteria.tx_context.as_ref());

        let result = match tokio::time::timeout(self.config.lookup_timeout(), lookup).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Timeout(self.config.lookup_timeout_ms)),
        };

        match result? {
            Some(package) => {
                debug!(
                    namespace = %criteria.namespace,
                    tx = ?criteria.tx_context,
                    collections = package.len(),
                    "Resolved collection config package"
                );
                Ok(package)
            }
            None => Err(CollectionError::NamespaceNotFound(criteria.namespace.clone())),
        }
    }

    /// Resolve the package and pick the named collection out of it.
    async fn resolve_config(
        &self,
        criteria: &CollectionCriteria,
    ) -> Result<(CollectionConfigPackage, CollectionConfig), CollectionError> {
        let package = self.resolve_package(criteria).await?;
        let config = package
            .find(&criteria.collection)
            .cloned()
            .ok_or_else(|| CollectionError::NotFound {
                namespace: criteria.namespace.clone(),
                collection: criteria.collection.clone(),
            })?;
        Ok((package, config))
    }

    async fn resolve_collection(
        &self,
        criteria: &CollectionCriteria,
    ) -> Result<SimpleCollection, CollectionError> {
        let (_, config) = self.resolve_config(criteria).await?;
        SimpleCollection::setup(&config, Arc::clone(&self.deserializer))
    }
}

#[async_trait]
impl CollectionStore for SimpleCollectionStore {
    async fn retrieve_collection(
        &self,
        criteria: &CollectionCriteria,
    ) -> Result<Arc<dyn Collection>, CollectionError> {
        let collection = self.resolve_collection(criteria).await?;
        Ok(Arc::new(collection))
    }

    async fn retrieve_collection_access_policy(
        &self,
        criteria: &CollectionCriteria,
    ) -> Result<Arc<dyn CollectionAccessPolicy>, CollectionError> {
        let collection = self.resolve_collection(criteria).await?;
        Ok(Arc::new(collection))
    }

    async fn retrieve_collection_config_package(
        &self,
        criteria: &CollectionCriteria,
    ) -> Result<CollectionConfigPackage, CollectionError> {
        let (package, _) = self.resolve_config(criteria).await?;
        validate_config_package(&package)?;
        Ok(package)
    }
}
