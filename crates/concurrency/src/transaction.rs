//! Transaction context for OCC
//!
//! A `TransactionContext` is the staging area of one transaction:
//! - read_set: first read of each key from the store (first read wins)
//! - write_set: buffered writes (last write wins)
//! - status: lifecycle state
//!
//! ## Lifecycle
//!
//! ```text
//! Active ──begin_commit()──▶ Committing ──finish()──▶ Committed | Aborted
//!    ▲                                                      │
//!    └──────────────── next read/write (begin()) ───────────┘
//! ```
//!
//! `begin_commit()` moves both buffers out into an [`RwSet`], so the context
//! is empty again whatever the outcome.

use occkv_core::{Entry, Error, Outcome, ReadRecord, Result, RwSet, WriteRecord};
use std::collections::BTreeMap;

/// Lifecycle state of the current transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Accepting reads and writes
    Active,
    /// Submitted for validation; no reads or writes accepted
    Committing,
    /// Validated and applied
    Committed,
    /// Not applied
    Aborted {
        /// Why the transaction did not commit
        reason: String,
    },
}

impl TransactionStatus {
    /// Committed or Aborted
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Committed | TransactionStatus::Aborted { .. }
        )
    }
}

/// Read/write buffers of one transaction
#[derive(Debug)]
pub struct TransactionContext {
    client_ref: String,
    read_set: BTreeMap<String, ReadRecord>,
    write_set: BTreeMap<String, WriteRecord>,
    status: TransactionStatus,
}

impl TransactionContext {
    /// Create an empty, active context
    pub fn new(client_ref: impl Into<String>) -> Self {
        Self {
            client_ref: client_ref.into(),
            read_set: BTreeMap::new(),
            write_set: BTreeMap::new(),
            status: TransactionStatus::Active,
        }
    }

    /// Identifier sent along with the read/write sets
    pub fn client_ref(&self) -> &str {
        &self.client_ref
    }

    /// Current status
    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    /// Number of keys read from the store
    pub fn read_count(&self) -> usize {
        self.read_set.len()
    }

    /// Number of keys with a buffered write
    pub fn write_count(&self) -> usize {
        self.write_set.len()
    }

    /// Start a new transaction if the previous one has finished.
    ///
    /// Fails while a commit is in progress.
    pub fn begin(&mut self) -> Result<()> {
        match self.status {
            TransactionStatus::Active => Ok(()),
            TransactionStatus::Committing => Err(Error::InvalidState(
                "transaction is committing".to_string(),
            )),
            TransactionStatus::Committed | TransactionStatus::Aborted { .. } => {
                self.status = TransactionStatus::Active;
                Ok(())
            }
        }
    }

    /// Entry already known to this transaction.
    ///
    /// A buffered write wins over a recorded read (read-your-own-writes).
    /// `None` means the store has to be asked.
    pub fn lookup(&self, key: &str) -> Option<Entry> {
        if let Some(write) = self.write_set.get(key) {
            return Some(write.to_entry());
        }
        self.read_set.get(key).map(ReadRecord::to_entry)
    }

    /// Record an entry just read from the store and return what the
    /// transaction observes for that key.
    ///
    /// If the key was already recorded, the earlier record is kept and returned.
    pub fn record_read(&mut self, entry: Entry) -> Entry {
        self.read_set
            .entry(entry.key.clone())
            .or_insert_with(|| ReadRecord::capture(entry))
            .to_entry()
    }

    /// Buffer a write, replacing any earlier write to the same key
    pub fn buffer_write(&mut self, key: &str, value: &str) {
        self.write_set
            .insert(key.to_string(), WriteRecord::propose(key, value));
    }

    /// Move the buffers into an [`RwSet`] and enter `Committing`.
    ///
    /// Both buffers are empty afterwards.
    pub fn begin_commit(&mut self) -> Result<RwSet> {
        self.begin()?;
        self.status = TransactionStatus::Committing;
        Ok(RwSet {
            client_ref: self.client_ref.clone(),
            read_set: std::mem::take(&mut self.read_set).into_values().collect(),
            write_set: std::mem::take(&mut self.write_set).into_values().collect(),
        })
    }

    /// Record the validator's decision
    pub fn finish(&mut self, outcome: Outcome) {
        self.status = match outcome {
            Outcome::Success => TransactionStatus::Committed,
            Outcome::Abort => TransactionStatus::Aborted {
                reason: "read set no longer current".to_string(),
            },
        };
    }

    /// Record a commit that could not reach a decision
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = TransactionStatus::Aborted {
            reason: reason.into(),
        };
    }
}
