//! Transaction engine for occkv
//!
//! Provides the [`Coordinator`]: one instance per client session. It buffers
//! the client's reads and writes, serves read-your-own-writes locally, and
//! hands the buffered sets to the validator on commit.
//!
//! The coordinator receives its store and validator as injected handles, so
//! the same code runs against in-process services and remote clients.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;

pub use coordinator::Coordinator;
