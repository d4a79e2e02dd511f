//! Commit validator
//!
//! The validator is the only component that mutates the store on behalf of
//! transactions. Every commit passes through one exclusive section, so a
//! transaction never validates against a store that another commit is
//! halfway through changing.
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. Acquire the exclusive section
//! 2. Count the attempt
//! 3. validate_read_set() - compare observed versions with the store
//! 4. IF any read is stale: return Abort, nothing applied
//! 5. Resolve the current version of every write-set key
//! 6. Allocate a fresh version per write (logical counter)
//! 7. Apply every write to the store
//! 8. Count the success, return Success
//! 9. Release the exclusive section
//! ```
//!
//! Step 5 completes for all keys before step 7 starts, so a write to an absent
//! key, or to a key whose version cannot be raised, fails the commit before
//! anything is applied. A store failure during step 7 leaves the earlier
//! writes in place and is logged with the keys already applied.

use crate::validation::validate_read_set;
use async_trait::async_trait;
use occkv_core::{
    Error, Outcome, Result, RwSet, StoreApi, TxnStats, ValidatorApi, Version, INITIAL_VERSION,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// State mutated only inside the exclusive section
#[derive(Debug)]
struct CommitState {
    stats: TxnStats,
    /// Lower bound for the next version handed out
    next_version: Version,
}

/// Serializes validation and application of commits
///
/// # Versions
///
/// Each applied write gets `max(next_version, current + 1)`, and the counter
/// moves past it. Versions are therefore strictly increasing per key and
/// unique across the store, independent of clock resolution.
///
/// # Thread Safety
///
/// The exclusive section is an async mutex held across the store calls of one
/// commit. Requests that arrive while it is held wait their turn; there is no
/// ordering guarantee beyond the mutex's own.
pub struct Validator {
    store: Arc<dyn StoreApi>,
    state: Mutex<CommitState>,
    stopped: AtomicBool,
}

impl Validator {
    /// Create a validator over a store
    pub fn new(store: Arc<dyn StoreApi>) -> Self {
        Self {
            store,
            state: Mutex::new(CommitState {
                stats: TxnStats::default(),
                next_version: INITIAL_VERSION + 1,
            }),
            stopped: AtomicBool::new(false),
        }
    }

    /// Check if the validator has been stopped
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Validate one transaction and apply its writes on success
    pub async fn commit(&self, rwset: RwSet) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        if self.is_stopped() {
            return Err(Error::Stopped("validator".into()));
        }
        state.stats.total_attempts += 1;

        debug!(
            client = %rwset.client_ref,
            reads = rwset.read_set.len(),
            writes = rwset.write_set.len(),
            "Validating transaction"
        );

        let validation = validate_read_set(&rwset.read_set, self.store.as_ref()).await?;
        if let Some(conflict) = validation.conflicts.first() {
            warn!(
                client = %rwset.client_ref,
                key = conflict.key(),
                ?conflict,
                "Transaction aborted, read set no longer current"
            );
            return Ok(Outcome::Abort);
        }

        let mut next_version = state.next_version;
        let mut plan = Vec::with_capacity(rwset.write_set.len());
        for write in &rwset.write_set {
            let current = self.store.read(&write.key).await?;
            let version = current
                .version
                .checked_add(1)
                .map(|v| v.max(next_version))
                .ok_or_else(|| version_exhausted(&write.key))?;
            next_version = version
                .checked_add(1)
                .ok_or_else(|| version_exhausted(&write.key))?;
            plan.push((write, version));
        }
        state.next_version = next_version;

        let mut applied: Vec<&str> = Vec::with_capacity(plan.len());
        for (write, version) in plan {
            if let Err(e) = self
                .store
                .write(&write.key, &write.new_value, version)
                .await
            {
                if !applied.is_empty() {
                    error!(
                        client = %rwset.client_ref,
                        ?applied,
                        failed = %write.key,
                        error = %e,
                        "Store write failed with part of the write set applied"
                    );
                }
                return Err(e);
            }
            debug!(key = %write.key, version, "Updated entry");
            applied.push(&write.key);
        }

        state.stats.successes += 1;
        info!(
            client = %rwset.client_ref,
            writes = rwset.write_set.len(),
            success_ratio = state.stats.success_ratio(),
            "Transaction committed"
        );
        Ok(Outcome::Success)
    }

    /// Snapshot of the counters
    pub async fn counters(&self) -> TxnStats {
        self.state.lock().await.stats
    }

    /// Stop once the exclusive section is free
    pub async fn shutdown(&self) {
        let state = self.state.lock().await;
        if !self.stopped.swap(true, Ordering::AcqRel) {
            info!(
                attempts = state.stats.total_attempts,
                successes = state.stats.successes,
                "Validator stopped"
            );
        }
    }
}

fn version_exhausted(key: &str) -> Error {
    Error::Internal(format!("no version left above the current one for key {}", key))
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

#[async_trait]
impl ValidatorApi for Validator {
    async fn validate(&self, rwset: RwSet) -> Result<Outcome> {
        self.commit(rwset).await
    }

    async fn stats(&self) -> Result<TxnStats> {
        Ok(self.counters().await)
    }

    async fn stop(&self) -> Result<()> {
        self.shutdown().await;
        Ok(())
    }
}
