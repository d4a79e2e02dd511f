//! Networked services for occkv
//!
//! - [`rpc`]: the line-delimited JSON server loop
//! - [`services`]: op-to-trait adapters for each service
//! - [`client`]: remote implementations of the service traits
//! - [`dispatcher`]: per-client coordinator allocation
//! - [`config`]: TOML cluster configuration
//!
//! The `start_*` functions bring up one service each; [`start_cluster`]
//! brings up all three in one process, wiring them by their bound addresses.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod rpc;
pub mod services;

pub use client::{Connection, DispatcherClient, RemoteCoordinator, RemoteStore, RemoteValidator};
pub use config::{ClusterConfig, ConfigError, DispatcherConfig, StoreConfig, ValidatorConfig};
pub use dispatcher::Dispatcher;
pub use rpc::{ServerHandle, Service};

use occkv_concurrency::Validator;
use occkv_core::Result;
use occkv_storage::VersionedStore;
use services::{DispatcherService, StoreService, ValidatorService};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// A service instance and the server exposing it
#[derive(Debug)]
pub struct Running<T> {
    service: Arc<T>,
    handle: ServerHandle,
}

impl<T> Running<T> {
    /// The in-process service
    pub fn service(&self) -> &Arc<T> {
        &self.service
    }

    /// The server
    pub fn handle(&self) -> &ServerHandle {
        &self.handle
    }

    /// Address the server is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.handle.local_addr()
    }

    /// Split into service and server
    pub fn into_parts(self) -> (Arc<T>, ServerHandle) {
        (self.service, self.handle)
    }
}

/// Seed a store and serve it
pub async fn start_store(config: &StoreConfig) -> Result<Running<VersionedStore>> {
    let store = Arc::new(VersionedStore::seeded(config.entries));
    let handle = rpc::serve(&config.addr, Arc::new(StoreService::new(store.clone()))).await?;
    info!(addr = %handle.local_addr(), entries = config.entries, "Store started");
    Ok(Running {
        service: store,
        handle,
    })
}

/// Connect a validator to the store at `store_addr` and serve it
pub async fn start_validator(
    config: &ValidatorConfig,
    store_addr: &str,
) -> Result<Running<Validator>> {
    let store = Arc::new(RemoteStore::connect(store_addr).await?);
    let validator = Arc::new(Validator::new(store));
    let handle =
        rpc::serve(&config.addr, Arc::new(ValidatorService::new(validator.clone()))).await?;
    info!(addr = %handle.local_addr(), store = store_addr, "Validator started");
    Ok(Running {
        service: validator,
        handle,
    })
}

/// Serve a dispatcher whose coordinators use the given store and validator
pub async fn start_dispatcher(
    config: &DispatcherConfig,
    store_addr: &str,
    validator_addr: &str,
) -> Result<Running<Dispatcher>> {
    let dispatcher = Arc::new(Dispatcher::new(
        store_addr,
        validator_addr,
        config.coordinator_host.clone(),
    ));
    let handle =
        rpc::serve(&config.addr, Arc::new(DispatcherService::new(dispatcher.clone()))).await?;
    info!(addr = %handle.local_addr(), "Dispatcher started");
    Ok(Running {
        service: dispatcher,
        handle,
    })
}

/// Every service of a cluster, running in this process
#[derive(Debug)]
pub struct ClusterServers {
    /// The store
    pub store: Running<VersionedStore>,
    /// The validator
    pub validator: Running<Validator>,
    /// The dispatcher
    pub dispatcher: Running<Dispatcher>,
}

impl ClusterServers {
    /// Address clients should connect to
    pub fn dispatcher_addr(&self) -> SocketAddr {
        self.dispatcher.local_addr()
    }

    /// Stop every service, dispatcher first
    pub async fn shutdown(self) -> Result<()> {
        self.dispatcher.service.shutdown().await;
        self.dispatcher.handle.shutdown();
        self.validator.service.shutdown().await;
        self.validator.handle.shutdown();
        self.store.service.halt();
        self.store.handle.shutdown();

        self.dispatcher.handle.join().await?;
        self.validator.handle.join().await?;
        self.store.handle.join().await
    }
}

/// Start store, validator and dispatcher, each connected to the addresses the
/// previous ones actually bound.
pub async fn start_cluster(config: &ClusterConfig) -> Result<ClusterServers> {
    let store = start_store(&config.store).await?;
    let store_addr = store.local_addr().to_string();

    let validator = start_validator(&config.validator, &store_addr).await?;
    let validator_addr = validator.local_addr().to_string();

    let dispatcher = start_dispatcher(&config.dispatcher, &store_addr, &validator_addr).await?;

    Ok(ClusterServers {
        store,
        validator,
        dispatcher,
    })
}
