//! Error types for occkv
//!
//! A validation conflict is not an error: it is reported as
//! [`Outcome::Abort`](crate::Outcome::Abort). Everything here is a hard
//! failure that propagates to the immediate caller without retry.
//!
//! ## Error Codes (Canonical)
//!
//! These codes travel on the wire and must not change:
//!
//! | Code | Description |
//! |------|-------------|
//! | KeyNotFound | Key is absent from the store |
//! | StaleVersion | Store write would not increase the key's version |
//! | Connectivity | A remote call could not complete |
//! | Stopped | The service has been stopped |
//! | InvalidState | Operation not allowed in the current transaction state |
//! | Protocol | Malformed or mismatched wire message |
//! | Internal | Bug or invariant violation |

use crate::types::Version;
use thiserror::Error;

/// All occkv errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Key is absent from the store
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing key
        key: String,
    },

    /// A store write carried a version that does not exceed the current one
    #[error("stale version for key {key}: current {current}, proposed {proposed}")]
    StaleVersion {
        /// Key being written
        key: String,
        /// Version currently stored
        current: Version,
        /// Version the writer supplied
        proposed: Version,
    },

    /// Remote call failed (connect, send, receive)
    #[error("connectivity failure: {0}")]
    Connectivity(String),

    /// The named service no longer accepts operations
    #[error("{0} is stopped")]
    Stopped(String),

    /// Operation not valid in the current transaction state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Malformed or mismatched wire message
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for occkv operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the canonical error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::KeyNotFound { .. } => "KeyNotFound",
            Error::StaleVersion { .. } => "StaleVersion",
            Error::Connectivity(_) => "Connectivity",
            Error::Stopped(_) => "Stopped",
            Error::InvalidState(_) => "InvalidState",
            Error::Protocol(_) => "Protocol",
            Error::Internal(_) => "Internal",
        }
    }

    /// Shorthand for [`Error::KeyNotFound`]
    pub fn not_found(key: impl Into<String>) -> Self {
        Error::KeyNotFound { key: key.into() }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }

    /// Check if the remote side could not be reached or has gone away.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connectivity(_) | Error::Stopped(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Connectivity(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Protocol(e.to_string())
    }
}
