//! Shared helpers

pub use occkv::prelude::*;
pub use occkv::SEED_VALUE;
pub use occkv_server::{
    start_cluster, ClusterConfig, ClusterServers, DispatcherClient, RemoteCoordinator,
    RemoteStore, RemoteValidator,
};

/// A cluster on ephemeral ports with keys "1"..="entries"
pub async fn cluster(entries: usize) -> ClusterServers {
    start_cluster(&ClusterConfig::ephemeral().with_entries(entries))
        .await
        .unwrap()
}

/// Dispatcher client for a running cluster
pub async fn dispatcher(servers: &ClusterServers) -> DispatcherClient {
    DispatcherClient::connect(&servers.dispatcher_addr().to_string())
        .await
        .unwrap()
}

/// A fresh coordinator, obtained through the dispatcher
pub async fn client(servers: &ClusterServers) -> RemoteCoordinator {
    dispatcher(servers).await.open_coordinator().await.unwrap()
}
