//! # Domain Invariants
//!
//! Rules every committed collection config must satisfy.

use super::entities::{CollectionConfig, CollectionConfigPackage};
use super::errors::CollectionError;
use super::policy::CompiledPolicy;
use std::collections::HashSet;

/// Maximum collection name length.
pub const MAX_COLLECTION_NAME_LEN: usize = 128;

/// Invariant: maximum peer count is not below required peer count.
pub fn invariant_peer_counts(required: u32, maximum: u32) -> Result<(), CollectionError> {
    if maximum < required {
        return Err(CollectionError::MalformedConfig(format!(
            "maximum peer count ({}) is below required peer count ({})",
            maximum, required
        )));
    }
    Ok(())
}

/// Invariant: collection name is `[A-Za-z0-9_-]+` and starts alphanumeric.
pub fn invariant_collection_name(name: &str) -> Result<(), CollectionError> {
    let first = name
        .chars()
        .next()
        .ok_or_else(|| CollectionError::MalformedConfig("empty collection name".to_string()))?;

    if name.len() > MAX_COLLECTION_NAME_LEN {
        return Err(CollectionError::MalformedConfig(format!(
            "collection name exceeds {} bytes",
            MAX_COLLECTION_NAME_LEN
        )));
    }
    if !first.is_ascii_alphanumeric()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CollectionError::MalformedConfig(format!(
            "invalid collection name: {}",
            name
        )));
    }
    Ok(())
}

/// Validate one collection config and return its compiled policy.
pub fn validate_collection_config(
    config: &CollectionConfig,
) -> Result<CompiledPolicy, CollectionError> {
    invariant_collection_name(&config.name)?;
    invariant_peer_counts(config.required_peer_count, config.maximum_peer_count)?;
    CompiledPolicy::compile(&config.member_orgs_policy).map_err(|e| {
        CollectionError::MalformedConfig(format!("collection {}: {}", config.name, e))
    })
}

/// Validate a whole package: every config valid, names unique.
pub fn validate_config_package(package: &CollectionConfigPackage) -> Result<(), CollectionError> {
    let mut seen = HashSet::new();
    for config in &package.configs {
        validate_collection_config(config)?;
        if !seen.insert(config.name.as_str()) {
            return Err(CollectionError::MalformedConfig(format!(
                "duplicate collection name: {}",
                config.name
            )));
        }
    }
    Ok(())
}
