//! JSON framing for occkv envelopes
//!
//! A frame is one serialized envelope followed by `\n`. serde_json never
//! emits a raw newline inside a document, so the delimiter is unambiguous.

mod envelope;
mod error;

pub use envelope::{
    CoordinatorOp, DispatcherOp, Operation, Reply, Request, Response, StoreOp, ValidatorOp,
    WireResult,
};
pub use error::WireError;

use occkv_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value as one newline-terminated frame
pub fn encode_frame<T: Serialize>(value: &T) -> Result<String> {
    let mut frame = serde_json::to_string(value)?;
    frame.push('\n');
    Ok(frame)
}

/// Decode one frame; surrounding whitespace and the trailing newline are ignored
pub fn decode_frame<T: DeserializeOwned>(line: &str) -> Result<T> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(Error::Protocol("empty frame".to_string()));
    }
    Ok(serde_json::from_str(trimmed)?)
}
