//! # occkv
//!
//! Transactions over a shared versioned key-value store, using optimistic
//! concurrency control.
//!
//! Clients read and write through a per-client [`Coordinator`], which buffers
//! everything until commit. At commit the [`Validator`] re-checks every read
//! against the [`VersionedStore`] and applies the writes only if nothing read
//! has changed since; otherwise the transaction aborts with no effect.
//!
//! ## Quick Start
//!
//! ```
//! use occkv::prelude::*;
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let cluster = Cluster::seeded(10);
//!     let alice = cluster.coordinator();
//!     let bob = cluster.coordinator();
//!
//!     alice.read("1").await.unwrap();
//!     bob.read("1").await.unwrap();
//!     alice.write("1", "5").await.unwrap();
//!     bob.write("1", "7").await.unwrap();
//!
//!     // First to commit wins; the other read a value that is now stale.
//!     assert_eq!(alice.commit().await.unwrap(), Outcome::Success);
//!     assert_eq!(bob.commit().await.unwrap(), Outcome::Abort);
//! });
//! ```
//!
//! ## Layers
//!
//! - [`occkv_core`]: data model, errors and service traits
//! - [`occkv_storage`]: the store
//! - [`occkv_concurrency`]: transaction buffers, read-set validation, the validator
//! - [`occkv_engine`]: the coordinator
//! - [`occkv_server`]: TCP services, remote clients, dispatcher and configuration

#![warn(missing_docs)]

mod cluster;

pub mod prelude;

pub use cluster::{Cluster, ClusterBuilder, ClusterMetrics};

pub use occkv_concurrency::{TransactionStatus, Validator};
pub use occkv_core::{
    CoordinatorApi, Entry, Error, Outcome, ReadRecord, Result, RwSet, StoreApi, TxnStats,
    ValidatorApi, Version, WriteRecord, INITIAL_VERSION, SEED_VALUE,
};
pub use occkv_engine::Coordinator;
pub use occkv_server::{
    start_cluster, ClusterConfig, ClusterServers, DispatcherClient, RemoteCoordinator,
};
pub use occkv_storage::VersionedStore;
