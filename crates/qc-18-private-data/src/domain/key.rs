//! # Collection KVS Keys
//!
//! Key under which a namespace's collection config package is persisted.
//!
//! The separator is illegal in namespace names and versions, so a generated
//! key never collides with another key of the same keyspace.

/// Separator between namespace and suffix.
pub const COLLECTION_SEPARATOR: &str = "~";

/// Suffix of every collection config key.
pub const COLLECTION_SUFFIX: &str = "collection";

/// Build the KVS key for a namespace's collection configs.
pub fn build_collection_key(namespace: &str) -> String {
    let capacity = namespace.len() + COLLECTION_SEPARATOR.len() + COLLECTION_SUFFIX.len();
    let mut key = String::with_capacity(capacity);
    key.push_str(namespace);
    key.push_str(COLLECTION_SEPARATOR);
    key.push_str(COLLECTION_SUFFIX);
    key
}

/// Recover the namespace from a collection config key.
///
/// Returns `None` for keys not built by [`build_collection_key`].
pub fn parse_collection_key(key: &str) -> Option<&str> {
    let namespace = key
        .strip_suffix(COLLECTION_SUFFIX)?
        .strip_suffix(COLLECTION_SEPARATOR)?;
    if namespace.contains(COLLECTION_SEPARATOR) {
        return None;
    }
    Some(namespace)
}
