//! In-Memory Config History Adapter
//!
//! Implements `ConfigHistory` over an append-only, versioned key-value log.
//!
//! Every committed transaction takes the next commit position. Config
//! packages are stored as bincode blobs under `build_collection_key(ns)`,
//! tagged with the position of the transaction that wrote them.

use crate::domain::{
    build_collection_key, parse_collection_key, validate_config_package, CollectionConfigPackage,
    LedgerError, TxId,
};
use crate::ports::outbound::ConfigHistory;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

/// One committed version of a config blob.
#[derive(Clone, Debug)]
struct ConfigVersion {
    position: u64,
    tx_id: TxId,
    blob: Vec<u8>,
}

#[derive(Default)]
struct HistoryState {
    next_position: u64,
    tx_positions: HashMap<TxId, u64>,
    versions: HashMap<String, Vec<ConfigVersion>>,
}

/// Versioned config history held in memory.
///
/// In production this is backed by the ledger's history database.
#[derive(Default)]
pub struct InMemoryConfigHistory {
    state: RwLock<HistoryState>,
}

impl InMemoryConfigHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a transaction that writes config packages.
    ///
    /// All updates become visible atomically. Packages are validated first;
    /// an invalid package rejects the whole transaction.
    pub fn commit(
        &self,
        tx_id: TxId,
        updates: Vec<(String, CollectionConfigPackage)>,
    ) -> Result<u64, LedgerError> {
        let mut encoded = Vec::with_capacity(updates.len());
        for (namespace, package) in &updates {
            validate_config_package(package)
                .map_err(|e| LedgerError::Rejected(format!("{}: {}", namespace, e)))?;
            let blob = bincode::serialize(package)
                .map_err(|e| LedgerError::Rejected(format!("{}: {}", namespace, e)))?;
            encoded.push((build_collection_key(namespace), blob));
        }
        self.append(tx_id, encoded)
    }

    /// Commit a transaction that touches no collection config.
    pub fn record_tx(&self, tx_id: TxId) -> Result<u64, LedgerError> {
        self.append(tx_id, Vec::new())
    }

    /// Commit pre-encoded blobs (e.g. restored from a snapshot) unchecked.
    pub fn commit_raw(&self, tx_id: TxId, key: String, blob: Vec<u8>) -> Result<u64, LedgerError> {
        self.append(tx_id, vec![(key, blob)])
    }

    fn append(&self, tx_id: TxId, writes: Vec<(String, Vec<u8>)>) -> Result<u64, LedgerError> {
        let mut state = self.state.write();

        if state.tx_positions.contains_key(&tx_id) {
            return Err(LedgerError::Rejected(format!(
                "transaction {} already committed",
                tx_id
            )));
        }

        let position = state.next_position;
        state.next_position += 1;
        state.tx_positions.insert(tx_id.clone(), position);

        for (key, blob) in writes {
            info!(
                "[qc-18] Committing collection config {} at position {} (tx {})",
                key, position, tx_id
            );
            state.versions.entry(key).or_default().push(ConfigVersion {
                position,
                tx_id: tx_id.clone(),
                blob,
            });
        }

        Ok(position)
    }

    /// Commit position of a transaction, if committed.
    pub fn position_of(&self, tx_id: &TxId) -> Option<u64> {
        self.state.read().tx_positions.get(tx_id).copied()
    }

    /// Number of committed config versions for a namespace.
    pub fn version_count(&self, namespace: &str) -> usize {
        self.state
            .read()
            .versions
            .get(&build_collection_key(namespace))
            .map_or(0, Vec::len)
    }

    /// Transactions that wrote a namespace's config, oldest first.
    pub fn writers_of(&self, namespace: &str) -> Vec<TxId> {
        self.state
            .read()
            .versions
            .get(&build_collection_key(namespace))
            .map(|versions| versions.iter().map(|v| v.tx_id.clone()).collect())
            .unwrap_or_default()
    }

    /// Namespaces with at least one committed config, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let state = self.state.read();
        let mut namespaces: Vec<String> = state
            .versions
            .keys()
            .filter_map(|key| parse_collection_key(key))
            .map(str::to_string)
            .collect();
        namespaces.sort();
        namespaces
    }
}

#[async_trait]
impl ConfigHistory for InMemoryConfigHistory {
    async fn get_config_as_of(
        &self,
        namespace: &str,
        tx: Option<&TxId>,
    ) -> Result<Option<CollectionConfigPackage>, LedgerError> {
        let key = build_collection_key(namespace);
        let state = self.state.read();

        // Unknown tx: it is being simulated now and sees the latest config.
        let bound = tx
            .and_then(|t| state.tx_positions.get(t).copied())
            .unwrap_or(u64::MAX);

        let version = state
            .versions
            .get(&key)
            .and_then(|versions| versions.iter().rev().find(|v| v.position < bound));

        let Some(version) = version else {
            debug!("[qc-18] No collection config for {} below position {}", key, bound);
            return Ok(None);
        };

        debug!(
            "[qc-18] Resolved {} to version at position {} (tx {})",
            key, version.position, version.tx_id
        );

        bincode::deserialize(&version.blob)
            .map(Some)
            .map_err(|e| LedgerError::Corrupted {
                key,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CollectionConfig, SignaturePolicy};

    fn package(orgs: &[&str]) -> CollectionConfigPackage {
        CollectionConfigPackage::new(vec![CollectionConfig::new(
            "secret",
            orgs.iter().copied(),
            1,
            2,
        )])
    }

    #[tokio::test]
    async fn test_empty_history() {
        let history = InMemoryConfigHistory::new();
        let result = history.get_config_as_of("cc", None).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_latest_version() {
        let history = InMemoryConfigHistory::new();
        history
            .commit(TxId::new("deploy"), vec![("cc".into(), package(&["A"]))])
            .unwrap();
        history
            .commit(TxId::new("upgrade"), vec![("cc".into(), package(&["A", "B"]))])
            .unwrap();

        let latest = history.get_config_as_of("cc", None).await.unwrap().unwrap();
        assert_eq!(latest, package(&["A", "B"]));
        assert_eq!(history.version_count("cc"), 2);
    }

    #[tokio::test]
    async fn test_as_of_tx_sees_previous_version() {
        let history = InMemoryConfigHistory::new();
        history
            .commit(TxId::new("deploy"), vec![("cc".into(), package(&["A"]))])
            .unwrap();
        history.record_tx(TxId::new("t1")).unwrap();
        history
            .commit(TxId::new("upgrade"), vec![("cc".into(), package(&["A", "B"]))])
            .unwrap();

        let as_of_t1 = history
            .get_config_as_of("cc", Some(&TxId::new("t1")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(as_of_t1, package(&["A"]));
    }

    #[tokio::test]
    async fn test_as_of_writing_tx_excludes_its_own_write() {
        let history = InMemoryConfigHistory::new();
        history
            .commit(TxId::new("deploy"), vec![("cc".into(), package(&["A"]))])
            .unwrap();
        history
            .commit(TxId::new("upgrade"), vec![("cc".into(), package(&["A", "B"]))])
            .unwrap();

        let as_of_deploy = history
            .get_config_as_of("cc", Some(&TxId::new("deploy")))
            .await
            .unwrap();
        assert!(as_of_deploy.is_none());

        let as_of_upgrade = history
            .get_config_as_of("cc", Some(&TxId::new("upgrade")))
            .await
            .unwrap();
        assert_eq!(as_of_upgrade, Some(package(&["A"])));
    }

    #[tokio::test]
    async fn test_unknown_tx_sees_latest() {
        let history = InMemoryConfigHistory::new();
        history
            .commit(TxId::new("deploy"), vec![("cc".into(), package(&["A"]))])
            .unwrap();

        let result = history
            .get_config_as_of("cc", Some(&TxId::new("pending")))
            .await
            .unwrap();
        assert_eq!(result, Some(package(&["A"])));
    }

    #[test]
    fn test_duplicate_tx_rejected() {
        let history = InMemoryConfigHistory::new();
        history.record_tx(TxId::new("t")).unwrap();
        assert!(matches!(
            history.record_tx(TxId::new("t")),
            Err(LedgerError::Rejected(_))
        ));
    }

    #[test]
    fn test_invalid_package_rejected() {
        let history = InMemoryConfigHistory::new();
        let bad = CollectionConfigPackage::new(vec![CollectionConfig::new("c", ["A"], 5, 3)]);

        let result = history.commit(TxId::new("t"), vec![("cc".into(), bad)]);
        assert!(matches!(result, Err(LedgerError::Rejected(_))));
        assert!(history.position_of(&TxId::new("t")).is_none());
    }

    #[test]
    fn test_zero_threshold_policy_rejected() {
        let history = InMemoryConfigHistory::new();
        let mut open = CollectionConfig::new("secret", ["Org1MSP"], 0, 1);
        open.member_orgs_policy.rule = SignaturePolicy::NOutOf {
            n: 0,
            rules: vec![],
        };
        let pkg = CollectionConfigPackage::new(vec![open]);

        let result = history.commit(TxId::new("t"), vec![("cc".into(), pkg)]);
        assert!(matches!(result, Err(LedgerError::Rejected(_))));
        assert_eq!(history.version_count("cc"), 0);
    }

    #[tokio::test]
    async fn test_corrupted_blob() {
        let history = InMemoryConfigHistory::new();
        history
            .commit_raw(TxId::new("t"), build_collection_key("cc"), vec![0xff])
            .unwrap();

        let result = history.get_config_as_of("cc", None).await;
        assert!(matches!(result, Err(LedgerError::Corrupted { .. })));
    }

    #[test]
    fn test_namespaces_and_writers() {
        let history = InMemoryConfigHistory::new();
        history
            .commit(
                TxId::new("t1"),
                vec![("b".into(), package(&["A"])), ("a".into(), package(&["A"]))],
            )
            .unwrap();
        history
            .commit(TxId::new("t2"), vec![("a".into(), package(&["B"]))])
            .unwrap();

        assert_eq!(history.namespaces(), vec!["a", "b"]);
        assert_eq!(history.writers_of("a"), vec![TxId::new("t1"), TxId::new("t2")]);
        assert_eq!(history.position_of(&TxId::new("t2")), Some(1));
    }
}
