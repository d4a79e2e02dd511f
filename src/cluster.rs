//! In-process cluster
//!
//! One store, one validator and as many coordinators as there are clients,
//! all sharing the same address space. The networked deployment in
//! `occkv-server` runs the same components behind TCP.

use occkv_concurrency::Validator;
use occkv_core::{Entry, Result, ValidatorApi, INITIAL_VERSION, SEED_VALUE};
use occkv_engine::Coordinator;
use occkv_storage::VersionedStore;
use std::sync::Arc;

/// A store and its validator, ready to hand out coordinators.
///
/// # Example
///
/// ```
/// use occkv::prelude::*;
///
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// rt.block_on(async {
///     let cluster = Cluster::seeded(10);
///     let client = cluster.coordinator();
///
///     let entry = client.read("1").await.unwrap();
///     client.write("1", &(entry.value.parse::<i64>().unwrap() + 5).to_string()).await.unwrap();
///     assert_eq!(client.commit().await.unwrap(), Outcome::Success);
///
///     assert_eq!(cluster.store().get("1").unwrap().value, "5");
/// });
/// ```
#[derive(Debug, Clone)]
pub struct Cluster {
    store: Arc<VersionedStore>,
    validator: Arc<Validator>,
}

impl Cluster {
    /// Cluster whose store holds keys `"1"..="entries"`
    pub fn seeded(entries: usize) -> Self {
        Self::builder().entries(entries).build()
    }

    /// Create a builder
    pub fn builder() -> ClusterBuilder {
        ClusterBuilder::new()
    }

    /// The shared store
    pub fn store(&self) -> &Arc<VersionedStore> {
        &self.store
    }

    /// The shared validator
    pub fn validator(&self) -> &Arc<Validator> {
        &self.validator
    }

    /// A fresh coordinator for one client
    pub fn coordinator(&self) -> Coordinator {
        Coordinator::new(self.store.clone(), self.validator.clone())
    }

    /// A fresh coordinator with a chosen client reference
    pub fn coordinator_named(&self, client_ref: impl Into<String>) -> Coordinator {
        Coordinator::with_client_ref(client_ref, self.store.clone(), self.validator.clone())
    }

    /// Validator counters and a snapshot of the store
    pub async fn metrics(&self) -> Result<ClusterMetrics> {
        let stats = self.validator.stats().await?;
        Ok(ClusterMetrics {
            commits_attempted: stats.total_attempts,
            commits_succeeded: stats.successes,
            commits_aborted: stats.failures(),
            success_ratio: stats.success_ratio(),
            entries: self.store.snapshot()?,
        })
    }

    /// Stop the validator (after any in-flight commit) and then the store
    pub async fn shutdown(&self) {
        self.validator.shutdown().await;
        self.store.halt();
    }
}

/// Cluster metrics
#[derive(Debug, Clone)]
pub struct ClusterMetrics {
    /// Commits the validator has seen
    pub commits_attempted: u64,
    /// Commits that applied their writes
    pub commits_succeeded: u64,
    /// Commits that were rejected or failed
    pub commits_aborted: u64,
    /// `commits_succeeded / commits_attempted`, 0 when nothing was attempted
    pub success_ratio: f64,
    /// Store contents, sorted by key
    pub entries: Vec<Entry>,
}

/// Builder for an in-process cluster
#[derive(Debug, Clone, Default)]
pub struct ClusterBuilder {
    entries: usize,
    extra: Vec<(String, String)>,
}

impl ClusterBuilder {
    /// Empty store, no extra keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed keys `"1"..="n"` with the seed value
    pub fn entries(mut self, n: usize) -> Self {
        self.entries = n;
        self
    }

    /// Add one more key with its own initial value
    pub fn key(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Build the cluster
    pub fn build(self) -> Cluster {
        let store = Arc::new(VersionedStore::seeded(self.entries));
        for (key, value) in self.extra {
            store.insert(Entry::new(key, value, INITIAL_VERSION));
        }
        let validator = Arc::new(Validator::new(store.clone()));
        Cluster { store, validator }
    }
}
