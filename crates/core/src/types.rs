//! Data model shared by the store, the validator and the coordinators
//!
//! - [`Entry`]: a versioned key/value pair as held by the store
//! - [`ReadRecord`]: what a coordinator observed the first time it read a key
//! - [`WriteRecord`]: a buffered write intent, not yet applied
//! - [`RwSet`]: the read and write sets submitted for validation
//! - [`Outcome`]: the commit decision
//! - [`TxnStats`]: attempt/success counters

use serde::{Deserialize, Serialize};

/// Logical version stamp attached to a stored value.
///
/// Assigned only at write time and strictly increasing per key.
pub type Version = u64;

/// Microseconds since the Unix epoch.
pub type Timestamp = i64;

/// Version given to every entry the store is seeded with.
pub const INITIAL_VERSION: Version = 1;

/// Value given to every entry the store is seeded with.
pub const SEED_VALUE: &str = "0";

/// Current wall-clock time in microseconds.
///
/// Used for capture and proposal times only, never for commit versions.
pub fn now_micros() -> Timestamp {
    chrono::Utc::now().timestamp_micros()
}

/// A versioned key/value pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Key, unique within the store
    pub key: String,
    /// Current value
    pub value: String,
    /// Version of the last write to this key
    pub version: Version,
}

impl Entry {
    /// Create a new entry
    pub fn new(key: impl Into<String>, value: impl Into<String>, version: Version) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            version,
        }
    }
}

/// Snapshot of a key taken on its first read from the store within a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRecord {
    /// Key that was read
    pub key: String,
    /// Value observed in the store
    pub observed_value: String,
    /// Version observed in the store; the only thing validation compares
    pub observed_version: Version,
    /// When the read was captured
    pub captured_at: Timestamp,
}

impl ReadRecord {
    /// Capture an entry just returned by the store
    pub fn capture(entry: Entry) -> Self {
        Self {
            key: entry.key,
            observed_value: entry.value,
            observed_version: entry.version,
            captured_at: now_micros(),
        }
    }

    /// The entry as it was observed
    pub fn to_entry(&self) -> Entry {
        Entry::new(
            self.key.clone(),
            self.observed_value.clone(),
            self.observed_version,
        )
    }
}

/// Buffered write intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRecord {
    /// Key to write
    pub key: String,
    /// Value to apply on successful commit
    pub new_value: String,
    /// When the write was proposed
    pub proposed_at: Timestamp,
}

impl WriteRecord {
    /// Propose a write now
    pub fn propose(key: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: new_value.into(),
            proposed_at: now_micros(),
        }
    }

    /// The entry a read-your-own-write returns: the buffered value, with the
    /// proposal time standing in as the effective version.
    pub fn to_entry(&self) -> Entry {
        let version = Version::try_from(self.proposed_at).unwrap_or_default();
        Entry::new(self.key.clone(), self.new_value.clone(), version)
    }
}

/// Read and write sets submitted to the validator in one commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RwSet {
    /// Identifies the submitting coordinator, for logging
    pub client_ref: String,
    /// Reads to re-check, ordered by key
    pub read_set: Vec<ReadRecord>,
    /// Writes to apply on success, ordered by key
    pub write_set: Vec<WriteRecord>,
}

impl RwSet {
    /// Create an empty set for a client
    pub fn new(client_ref: impl Into<String>) -> Self {
        Self {
            client_ref: client_ref.into(),
            ..Default::default()
        }
    }

    /// True when nothing was read and nothing was written
    pub fn is_empty(&self) -> bool {
        self.read_set.is_empty() && self.write_set.is_empty()
    }
}

/// Commit decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every read was still current; all writes were applied
    Success,
    /// A read was stale; no write was applied
    Abort,
}

impl Outcome {
    /// Check if this outcome is [`Outcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Abort => write!(f, "Abort"),
        }
    }
}

/// Commit attempt counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnStats {
    /// Commits attempted
    pub total_attempts: u64,
    /// Commits that reached [`Outcome::Success`]
    pub successes: u64,
}

impl TxnStats {
    /// Count one finished attempt
    pub fn record(&mut self, outcome: Outcome) {
        self.total_attempts += 1;
        if outcome.is_success() {
            self.successes += 1;
        }
    }

    /// Commits that did not succeed
    pub fn failures(&self) -> u64 {
        self.total_attempts - self.successes
    }

    /// Fraction of attempts that succeeded, 0.0 when nothing was attempted
    pub fn success_ratio(&self) -> f64 {
        if self.total_attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.total_attempts as f64
        }
    }
}
