//! Service contracts
//!
//! One trait per service, with statically declared operations. The wire
//! dispatch in `occkv-server` maps requests onto these methods; nothing here
//! knows about transport.

use crate::error::Result;
use crate::types::{Entry, Outcome, RwSet, TxnStats, Version};
use async_trait::async_trait;

/// Authoritative versioned key/value state. No transactional logic.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Current entry for `key`, or [`Error::KeyNotFound`](crate::Error::KeyNotFound)
    async fn read(&self, key: &str) -> Result<Entry>;

    /// Replace value and version of an existing key.
    ///
    /// The caller supplies the version; the store never invents one.
    async fn write(&self, key: &str, new_value: &str, version: Version) -> Result<()>;

    /// Every entry, sorted by key. Diagnostic only.
    async fn read_all(&self) -> Result<Vec<Entry>>;

    /// Stop accepting operations
    async fn stop(&self) -> Result<()>;
}

/// The single serialization point for commits.
#[async_trait]
pub trait ValidatorApi: Send + Sync {
    /// Re-check the read set and, if every read is current, apply the write set.
    async fn validate(&self, rwset: RwSet) -> Result<Outcome>;

    /// Attempt and success counters
    async fn stats(&self) -> Result<TxnStats>;

    /// Stop accepting operations, once any in-flight validation has finished
    async fn stop(&self) -> Result<()>;
}

/// Per-client transaction staging area.
#[async_trait]
pub trait CoordinatorApi: Send + Sync {
    /// Read a key, honouring the transaction's own writes and earlier reads
    async fn read(&self, key: &str) -> Result<Entry>;

    /// Buffer a write; the store is not contacted
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Submit the buffered sets for validation and end the transaction
    async fn commit(&self) -> Result<Outcome>;

    /// Every store entry, passed through from the store. Diagnostic only.
    async fn read_all(&self) -> Result<Vec<Entry>>;

    /// Commit counters for this coordinator
    async fn stats(&self) -> Result<TxnStats>;

    /// Release the coordinator
    async fn stop(&self) -> Result<()>;
}
