//! Core types for occkv
//!
//! This crate defines what every layer shares:
//! - [`Entry`], [`ReadRecord`], [`WriteRecord`], [`RwSet`]: the data model
//! - [`Outcome`] and [`TxnStats`]: commit results and counters
//! - [`Error`]: the canonical error taxonomy
//! - [`StoreApi`], [`ValidatorApi`], [`CoordinatorApi`]: the service contracts
//!
//! The service traits are object safe, so an in-process implementation and a
//! remote client can be used interchangeably behind an `Arc<dyn ...>`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{CoordinatorApi, StoreApi, ValidatorApi};
pub use types::{
    now_micros, Entry, Outcome, ReadRecord, RwSet, Timestamp, TxnStats, Version, WriteRecord,
    INITIAL_VERSION, SEED_VALUE,
};
