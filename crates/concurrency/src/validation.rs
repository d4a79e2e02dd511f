//! Read-set validation
//!
//! A read is still valid when the store's current version of the key equals
//! the version the transaction observed. Values are never compared.
//!
//! Validation stops at the first conflict: one stale read is enough to abort,
//! and the order in which reads are checked does not change the decision.

use occkv_core::{Error, ReadRecord, Result, StoreApi, Version};

/// Why a read no longer holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// The key was written after the transaction read it
    StaleRead {
        /// Key that changed
        key: String,
        /// Version the transaction observed
        observed: Version,
        /// Version now in the store
        current: Version,
    },
    /// The key is no longer in the store
    MissingKey {
        /// Key that disappeared
        key: String,
    },
}

impl ConflictType {
    /// Key involved in the conflict
    pub fn key(&self) -> &str {
        match self {
            ConflictType::StaleRead { key, .. } | ConflictType::MissingKey { key } => key,
        }
    }
}

/// Result of checking a read set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Conflicts found; empty means the read set is still current
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Check if no conflict was found
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// A result holding a single conflict
    pub fn conflict(conflict: ConflictType) -> Self {
        Self {
            conflicts: vec![conflict],
        }
    }
}

/// Check every read against the store's current version.
///
/// An empty read set is always valid. A key missing from the store counts as
/// a conflict; any other store failure is returned as an error.
pub async fn validate_read_set(
    read_set: &[ReadRecord],
    store: &dyn StoreApi,
) -> Result<ValidationResult> {
    for read in read_set {
        let current = match store.read(&read.key).await {
            Ok(entry) => entry,
            Err(Error::KeyNotFound { key }) => {
                return Ok(ValidationResult::conflict(ConflictType::MissingKey { key }));
            }
            Err(e) => return Err(e),
        };

        if current.version != read.observed_version {
            return Ok(ValidationResult::conflict(ConflictType::StaleRead {
                key: read.key.clone(),
                observed: read.observed_version,
                current: current.version,
            }));
        }
    }

    Ok(ValidationResult::default())
}
