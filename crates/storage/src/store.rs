//! Versioned key/value store
//!
//! DashMap keyed by user key, FxHash for fast non-crypto hashing.
//!
//! # Design
//!
//! - Reads take a shard read guard and clone the entry
//! - Writes take the key's shard write guard and replace value and version
//!   together, so a concurrent read sees either the old entry or the new one
//! - The store never assigns versions; the writer supplies them
//!
//! Writes arrive only from the validator's exclusive section. The store does
//! not rely on that: its own guard rejects any version that would not
//! increase the key's version.

use async_trait::async_trait;
use dashmap::DashMap;
use occkv_core::{Entry, Error, Result, StoreApi, Version, INITIAL_VERSION, SEED_VALUE};
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// In-memory versioned store
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - get(): shard read guard, never observes a partial update
/// - put(): locks only the target key's shard
///
/// # Example
///
/// ```ignore
/// use occkv_storage::VersionedStore;
///
/// let store = VersionedStore::seeded(10);
/// let entry = store.get("1")?;
/// assert_eq!(entry.value, "0");
/// ```
pub struct VersionedStore {
    data: DashMap<String, Entry, FxBuildHasher>,
    stopped: AtomicBool,
}

impl VersionedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            data: DashMap::with_hasher(FxBuildHasher::default()),
            stopped: AtomicBool::new(false),
        }
    }

    /// Create a store holding keys `"1"..="n"`, each with value `"0"` at
    /// [`INITIAL_VERSION`]
    pub fn seeded(n: usize) -> Self {
        let store = Self {
            data: DashMap::with_capacity_and_hasher(n, FxBuildHasher::default()),
            stopped: AtomicBool::new(false),
        };
        for i in 1..=n {
            store.insert(Entry::new(i.to_string(), SEED_VALUE, INITIAL_VERSION));
        }
        info!(entries = n, "Seeded store");
        store
    }

    /// Insert or replace an entry wholesale, bypassing the version guard.
    ///
    /// Used for seeding; transactional writes go through [`put`](Self::put).
    pub fn insert(&self, entry: Entry) {
        self.data.insert(entry.key.clone(), entry);
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Check if [`halt`](Self::halt) has been called
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Current entry for a key
    #[inline]
    pub fn get(&self, key: &str) -> Result<Entry> {
        self.ensure_running()?;
        self.data
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::not_found(key))
    }

    /// Set value and version of an existing key
    ///
    /// # Errors
    ///
    /// - [`Error::KeyNotFound`] if the key is absent
    /// - [`Error::StaleVersion`] if `version` does not exceed the stored version
    #[inline]
    pub fn put(&self, key: &str, new_value: &str, version: Version) -> Result<()> {
        self.ensure_running()?;
        let mut entry = self.data.get_mut(key).ok_or_else(|| Error::not_found(key))?;
        if version <= entry.version {
            warn!(
                key,
                current = entry.version,
                proposed = version,
                "Rejected non-increasing version"
            );
            return Err(Error::StaleVersion {
                key: key.to_string(),
                current: entry.version,
                proposed: version,
            });
        }
        entry.value = new_value.to_string();
        entry.version = version;
        debug!(key, version, "Applied write");
        Ok(())
    }

    /// Every entry, sorted by key
    pub fn snapshot(&self) -> Result<Vec<Entry>> {
        self.ensure_running()?;
        let mut entries: Vec<Entry> = self.data.iter().map(|e| e.value().clone()).collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    /// Stop accepting operations
    pub fn halt(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            info!(entries = self.len(), "Store stopped");
        }
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_stopped() {
            return Err(Error::Stopped("store".into()));
        }
        Ok(())
    }
}

impl Default for VersionedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VersionedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedStore")
            .field("entries", &self.len())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

#[async_trait]
impl StoreApi for VersionedStore {
    async fn read(&self, key: &str) -> Result<Entry> {
        self.get(key)
    }

    async fn write(&self, key: &str, new_value: &str, version: Version) -> Result<()> {
        self.put(key, new_value, version)
    }

    async fn read_all(&self) -> Result<Vec<Entry>> {
        self.snapshot()
    }

    async fn stop(&self) -> Result<()> {
        self.halt();
        Ok(())
    }
}
