//! Concurrency layer for occkv
//!
//! This crate implements optimistic concurrency control (OCC) with:
//! - TransactionContext: read/write set tracking and lifecycle status
//! - Read-set validation against the store's current versions
//! - Validator: the single serialization point that validates and applies
//!   commits one at a time

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod transaction;
pub mod validation;
pub mod validator;

pub use transaction::{TransactionContext, TransactionStatus};
pub use validation::{validate_read_set, ConflictType, ValidationResult};
pub use validator::Validator;
