//! Wire encoding for occkv
//!
//! Every RPC is one JSON document per line over TCP.
//!
//! ## Envelopes
//!
//! | Direction | JSON |
//! |-----------|------|
//! | Request | `{"id": 7, "op": {"Read": {"key": "1"}}}` |
//! | Unit op | `{"id": 8, "op": "Commit"}` |
//! | Success | `{"id": 7, "result": {"Ok": {"Entry": {...}}}}` |
//! | Failure | `{"id": 7, "result": {"Err": {"code": "KeyNotFound", ...}}}` |
//!
//! Each service has its own op enum ([`StoreOp`], [`ValidatorOp`],
//! [`CoordinatorOp`], [`DispatcherOp`]); replies share [`Reply`].
//!
//! ## Examples
//!
//! ```
//! use occkv_wire::{decode_frame, encode_frame, Request, StoreOp};
//!
//! let frame = encode_frame(&Request::new(1, StoreOp::Read { key: "1".into() })).unwrap();
//! assert!(frame.ends_with('\n'));
//!
//! let decoded: Request<StoreOp> = decode_frame(&frame).unwrap();
//! assert_eq!(decoded.id, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod json;

// Re-export main types
pub use json::{
    decode_frame, encode_frame, CoordinatorOp, DispatcherOp, Operation, Reply, Request, Response,
    StoreOp, ValidatorOp, WireError, WireResult,
};
