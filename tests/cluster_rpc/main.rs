//! Cluster RPC Integration Tests
//!
//! Store, validator and dispatcher served over TCP on OS-assigned ports, with
//! clients going through the dispatcher exactly as a remote client would.

mod common;

mod dispatcher;
mod remote_transactions;
mod shutdown;
