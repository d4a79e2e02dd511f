//! Stop semantics

use crate::common::*;

#[tokio::test]
async fn dispatcher_stop_closes_its_coordinators() {
    let servers = cluster(2).await;
    let dispatcher = dispatcher(&servers).await;
    let c = dispatcher.open_coordinator().await.unwrap();
    assert_eq!(c.read("1").await.unwrap().value, SEED_VALUE);

    dispatcher.stop().await.unwrap();
    servers.dispatcher.handle().stopped().await;

    assert!(c.read("2").await.unwrap_err().is_connectivity());
    assert!(servers.dispatcher.service().is_stopped());

    servers.shutdown().await.unwrap();
}

#[tokio::test]
async fn validator_stop_surfaces_as_commit_failure() {
    let servers = cluster(2).await;
    let c = client(&servers).await;

    let validator = RemoteValidator::connect(&servers.validator.local_addr().to_string())
        .await
        .unwrap();
    validator.stop().await.unwrap();
    servers.validator.handle().stopped().await;

    c.write("1", "lost").await.unwrap();
    let err = c.commit().await.unwrap_err();
    assert!(err.is_connectivity());

    // The failed commit still ends the transaction.
    let stats = c.stats().await.unwrap();
    assert_eq!(stats.total_attempts, 1);
    assert_eq!(stats.successes, 0);
    assert_eq!(servers.store.service().get("1").unwrap().value, SEED_VALUE);

    servers.shutdown().await.unwrap();
}

#[tokio::test]
async fn store_stop_is_acknowledged_then_refused() {
    let servers = cluster(2).await;
    let store = RemoteStore::connect(&servers.store.local_addr().to_string())
        .await
        .unwrap();

    store.stop().await.unwrap();
    servers.store.handle().stopped().await;
    assert!(servers.store.service().is_stopped());

    // The store's connections are closed along with its listener.
    assert!(store.read("1").await.unwrap_err().is_connectivity());

    servers.shutdown().await.unwrap();
}

#[tokio::test]
async fn cluster_shutdown_joins_every_server() {
    let servers = cluster(1).await;
    let addr = servers.dispatcher_addr();
    servers.shutdown().await.unwrap();

    assert!(DispatcherClient::connect(&addr.to_string()).await.is_err());
}
