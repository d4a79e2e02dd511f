//! Transaction Integration Tests
//!
//! End-to-end behaviour of the in-process cluster: commit decisions, abort
//! isolation, versioning and concurrent clients.
//!
//! ```bash
//! cargo test --test transactions
//! cargo test --test transactions scenarios::
//! ```

mod common;

mod abort_isolation;
mod concurrency;
mod scenarios;
mod versioning;
