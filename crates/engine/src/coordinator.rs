//! Per-client transaction coordinator
//!
//! ## Operations
//!
//! - `read(key)`: own buffered write → earlier read → store (recorded)
//! - `write(key, value)`: buffered only, the store is not contacted
//! - `commit()`: drain both buffers into an [`RwSet`](occkv_core::RwSet),
//!   ask the validator, record the outcome
//!
//! A coordinator serves one client whose calls arrive one after another.
//! The buffers sit behind a short-lived lock that is never held across a
//! remote call.
//!
//! There is no automatic retry: an aborted transaction is reported to the
//! client, which decides whether to start another.

use async_trait::async_trait;
use occkv_concurrency::TransactionContext;
use occkv_core::{
    CoordinatorApi, Entry, Error, Outcome, Result, StoreApi, TxnStats, ValidatorApi,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Transaction staging area for one client
pub struct Coordinator {
    client_ref: String,
    store: Arc<dyn StoreApi>,
    validator: Arc<dyn ValidatorApi>,
    txn: Mutex<TransactionContext>,
    stats: Mutex<TxnStats>,
    stopped: AtomicBool,
}

impl Coordinator {
    /// Create a coordinator with a random client reference
    pub fn new(store: Arc<dyn StoreApi>, validator: Arc<dyn ValidatorApi>) -> Self {
        Self::with_client_ref(Uuid::new_v4().to_string(), store, validator)
    }

    /// Create a coordinator with an explicit client reference
    pub fn with_client_ref(
        client_ref: impl Into<String>,
        store: Arc<dyn StoreApi>,
        validator: Arc<dyn ValidatorApi>,
    ) -> Self {
        let client_ref = client_ref.into();
        Self {
            txn: Mutex::new(TransactionContext::new(client_ref.clone())),
            client_ref,
            store,
            validator,
            stats: Mutex::new(TxnStats::default()),
            stopped: AtomicBool::new(false),
        }
    }

    /// Reference sent to the validator with every commit
    pub fn client_ref(&self) -> &str {
        &self.client_ref
    }

    /// Check if the coordinator has been stopped
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Keys read from the store and keys written, in the open transaction
    pub fn pending(&self) -> (usize, usize) {
        let txn = self.txn.lock();
        (txn.read_count(), txn.write_count())
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_stopped() {
            return Err(Error::Stopped(format!("coordinator {}", self.client_ref)));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (reads, writes) = self.pending();
        f.debug_struct("Coordinator")
            .field("client_ref", &self.client_ref)
            .field("reads", &reads)
            .field("writes", &writes)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

#[async_trait]
impl CoordinatorApi for Coordinator {
    async fn read(&self, key: &str) -> Result<Entry> {
        self.ensure_running()?;
        {
            let mut txn = self.txn.lock();
            txn.begin()?;
            if let Some(entry) = txn.lookup(key) {
                debug!(client = %self.client_ref, key, "Read served from transaction buffers");
                return Ok(entry);
            }
        }

        let entry = self.store.read(key).await?;

        let mut txn = self.txn.lock();
        txn.begin()?;
        let observed = txn.record_read(entry);
        debug!(
            client = %self.client_ref,
            key,
            version = observed.version,
            "Read from store"
        );
        Ok(observed)
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_running()?;
        let mut txn = self.txn.lock();
        txn.begin()?;
        txn.buffer_write(key, value);
        debug!(client = %self.client_ref, key, "Buffered write");
        Ok(())
    }

    async fn commit(&self) -> Result<Outcome> {
        self.ensure_running()?;
        let rwset = self.txn.lock().begin_commit()?;

        let result = self.validator.validate(rwset).await;

        let mut txn = self.txn.lock();
        let mut stats = self.stats.lock();
        match &result {
            Ok(outcome) => {
                txn.finish(*outcome);
                stats.record(*outcome);
                info!(
                    client = %self.client_ref,
                    outcome = %outcome,
                    successes = stats.successes,
                    attempts = stats.total_attempts,
                    "Commit finished"
                );
            }
            Err(e) => {
                txn.fail(e.to_string());
                stats.total_attempts += 1;
                warn!(client = %self.client_ref, error = %e, "Commit failed");
            }
        }
        result
    }

    async fn read_all(&self) -> Result<Vec<Entry>> {
        self.ensure_running()?;
        self.store.read_all().await
    }

    async fn stats(&self) -> Result<TxnStats> {
        Ok(*self.stats.lock())
    }

    async fn stop(&self) -> Result<()> {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            info!(client = %self.client_ref, "Coordinator stopped");
        }
        Ok(())
    }
}
