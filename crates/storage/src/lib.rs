//! Storage layer for occkv
//!
//! This crate implements the authoritative key/value state:
//! - VersionedStore: DashMap of key → Entry, sharded, per-key atomic updates
//! - Seeding with keys "1".."N"
//! - Store-side guard that a key's version only increases

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;

pub use store::VersionedStore;
