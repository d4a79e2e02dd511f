//! Wire adapters for each service
//!
//! Each adapter maps one op enum onto the matching trait, so the same server
//! loop can front an in-process implementation or a remote client.

use crate::dispatcher::Dispatcher;
use crate::rpc::Service;
use async_trait::async_trait;
use occkv_core::{CoordinatorApi, Result, StoreApi, ValidatorApi};
use occkv_wire::{CoordinatorOp, DispatcherOp, Reply, StoreOp, ValidatorOp};
use std::sync::Arc;

/// Serves [`StoreOp`]s
pub struct StoreService {
    store: Arc<dyn StoreApi>,
}

impl StoreService {
    /// Wrap a store
    pub fn new(store: Arc<dyn StoreApi>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Service for StoreService {
    type Op = StoreOp;
    const NAME: &'static str = "store";

    async fn handle(&self, op: StoreOp) -> Result<Reply> {
        match op {
            StoreOp::Read { key } => self.store.read(&key).await.map(Reply::Entry),
            StoreOp::Write {
                key,
                new_value,
                version,
            } => {
                self.store.write(&key, &new_value, version).await?;
                Ok(Reply::Ack)
            }
            StoreOp::ReadAll => self.store.read_all().await.map(Reply::Entries),
            StoreOp::Stop => {
                self.store.stop().await?;
                Ok(Reply::Ack)
            }
        }
    }
}

/// Serves [`ValidatorOp`]s
pub struct ValidatorService {
    validator: Arc<dyn ValidatorApi>,
}

impl ValidatorService {
    /// Wrap a validator
    pub fn new(validator: Arc<dyn ValidatorApi>) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl Service for ValidatorService {
    type Op = ValidatorOp;
    const NAME: &'static str = "validator";

    async fn handle(&self, op: ValidatorOp) -> Result<Reply> {
        match op {
            ValidatorOp::Validate { rwset } => {
                self.validator.validate(rwset).await.map(Reply::Outcome)
            }
            ValidatorOp::GetStats => self.validator.stats().await.map(Reply::Stats),
            ValidatorOp::Stop => {
                self.validator.stop().await?;
                Ok(Reply::Ack)
            }
        }
    }
}

/// Serves [`CoordinatorOp`]s for one client
pub struct CoordinatorService {
    coordinator: Arc<dyn CoordinatorApi>,
}

impl CoordinatorService {
    /// Wrap a coordinator
    pub fn new(coordinator: Arc<dyn CoordinatorApi>) -> Self {
        Self { coordinator }
    }
}

#[async_trait]
impl Service for CoordinatorService {
    type Op = CoordinatorOp;
    const NAME: &'static str = "coordinator";

    async fn handle(&self, op: CoordinatorOp) -> Result<Reply> {
        match op {
            CoordinatorOp::Read { key } => self.coordinator.read(&key).await.map(Reply::Entry),
            CoordinatorOp::Write { key, value } => {
                self.coordinator.write(&key, &value).await?;
                Ok(Reply::Ack)
            }
            CoordinatorOp::Commit => self.coordinator.commit().await.map(Reply::Outcome),
            CoordinatorOp::ReadAll => self.coordinator.read_all().await.map(Reply::Entries),
            CoordinatorOp::GetStats => self.coordinator.stats().await.map(Reply::Stats),
            CoordinatorOp::Stop => {
                self.coordinator.stop().await?;
                Ok(Reply::Ack)
            }
        }
    }
}

/// Serves [`DispatcherOp`]s
pub struct DispatcherService {
    dispatcher: Arc<Dispatcher>,
}

impl DispatcherService {
    /// Wrap a dispatcher
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Service for DispatcherService {
    type Op = DispatcherOp;
    const NAME: &'static str = "dispatcher";

    async fn handle(&self, op: DispatcherOp) -> Result<Reply> {
        match op {
            DispatcherOp::GetHandlerPort => self.dispatcher.allocate().await.map(Reply::Port),
            DispatcherOp::Stop => {
                self.dispatcher.shutdown().await;
                Ok(Reply::Ack)
            }
        }
    }
}
