//! Wire error encoding
//!
//! Errors travel as:
//! ```json
//! {
//!   "code": "KeyNotFound",
//!   "message": "key not found: 9",
//!   "details": {"key": "9"}
//! }
//! ```
//!
//! `code` is one of the canonical codes of [`occkv_core::Error::code`];
//! `details` carries the fields needed to rebuild the exact variant.

use occkv_core::Error;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Wire representation of an [`Error`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    /// The canonical error code (e.g., "KeyNotFound", "Stopped")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Structured fields of the variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl WireError {
    /// Encode an error
    pub fn from_error(error: &Error) -> Self {
        let details = match error {
            Error::KeyNotFound { key } => json!({ "key": key }),
            Error::StaleVersion {
                key,
                current,
                proposed,
            } => json!({ "key": key, "current": current, "proposed": proposed }),
            Error::Connectivity(reason)
            | Error::Stopped(reason)
            | Error::InvalidState(reason)
            | Error::Protocol(reason)
            | Error::Internal(reason) => json!({ "reason": reason }),
        };

        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            details: Some(details),
        }
    }

    /// Rebuild the error variant.
    ///
    /// Unknown codes or missing details decode as [`Error::Internal`] carrying
    /// the message.
    pub fn into_error(self) -> Error {
        let details = self.details.unwrap_or(Value::Null);
        let text = |field: &str| details.get(field).and_then(Value::as_str).map(str::to_string);
        let number = |field: &str| details.get(field).and_then(Value::as_u64);

        let decoded = match self.code.as_str() {
            "KeyNotFound" => text("key").map(|key| Error::KeyNotFound { key }),
            "StaleVersion" => match (text("key"), number("current"), number("proposed")) {
                (Some(key), Some(current), Some(proposed)) => Some(Error::StaleVersion {
                    key,
                    current,
                    proposed,
                }),
                _ => None,
            },
            "Connectivity" => text("reason").map(Error::Connectivity),
            "Stopped" => text("reason").map(Error::Stopped),
            "InvalidState" => text("reason").map(Error::InvalidState),
            "Protocol" => text("reason").map(Error::Protocol),
            "Internal" => text("reason").map(Error::Internal),
            _ => None,
        };

        decoded.unwrap_or(Error::Internal(self.message))
    }
}
