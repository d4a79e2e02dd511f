//! Coordinator allocation
//!
//! The dispatcher is the entry point for clients. Each `GetHandlerPort`
//! starts a new coordinator on an OS-assigned port, with its own connections
//! to the store and the validator, and returns the port. The client then
//! talks to that coordinator directly.

use crate::client::{RemoteStore, RemoteValidator};
use crate::rpc::{self, ServerHandle};
use crate::services::CoordinatorService;
use occkv_core::{Error, Result, StoreApi, ValidatorApi};
use occkv_engine::Coordinator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

/// Starts per-client coordinators
pub struct Dispatcher {
    store_addr: String,
    validator_addr: String,
    host: String,
    coordinators: Mutex<Vec<ServerHandle>>,
    stopped: AtomicBool,
}

impl Dispatcher {
    /// Create a dispatcher whose coordinators bind on `host` and connect to
    /// the given store and validator.
    pub fn new(
        store_addr: impl Into<String>,
        validator_addr: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            store_addr: store_addr.into(),
            validator_addr: validator_addr.into(),
            host: host.into(),
            coordinators: Mutex::new(Vec::new()),
            stopped: AtomicBool::new(false),
        }
    }

    /// Check if the dispatcher has been stopped
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Start a coordinator and return its port
    pub async fn allocate(&self) -> Result<u16> {
        if self.is_stopped() {
            return Err(Error::Stopped("dispatcher".into()));
        }

        let listener = TcpListener::bind((self.host.as_str(), 0))
            .await
            .map_err(|e| Error::Connectivity(format!("bind {}:0: {}", self.host, e)))?;
        let port = listener.local_addr()?.port();

        let store: Arc<dyn StoreApi> = Arc::new(RemoteStore::connect(&self.store_addr).await?);
        let validator: Arc<dyn ValidatorApi> =
            Arc::new(RemoteValidator::connect(&self.validator_addr).await?);
        let coordinator = Arc::new(Coordinator::with_client_ref(
            port.to_string(),
            store,
            validator,
        ));
        let handle = rpc::spawn(listener, Arc::new(CoordinatorService::new(coordinator)))?;

        let mut coordinators = self.coordinators.lock().await;
        // Checked again under the lock so shutdown cannot miss this one.
        if self.is_stopped() {
            handle.shutdown();
            return Err(Error::Stopped("dispatcher".into()));
        }
        coordinators.retain(|h| !h.is_shutting_down());
        coordinators.push(handle);
        info!(port, active = coordinators.len(), "Allocated coordinator");
        Ok(port)
    }

    /// Coordinators that have not been stopped
    pub async fn active(&self) -> usize {
        self.coordinators
            .lock()
            .await
            .iter()
            .filter(|h| !h.is_shutting_down())
            .count()
    }

    /// Stop allocating and shut every coordinator down
    pub async fn shutdown(&self) {
        let mut coordinators = self.coordinators.lock().await;
        if !self.stopped.swap(true, Ordering::AcqRel) {
            for handle in coordinators.drain(..) {
                handle.shutdown();
            }
            info!("Dispatcher stopped");
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("store_addr", &self.store_addr)
            .field("validator_addr", &self.validator_addr)
            .field("host", &self.host)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
