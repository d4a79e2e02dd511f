//! Coordinator allocation

use crate::common::*;

#[tokio::test]
async fn every_client_gets_a_distinct_port() {
    let servers = cluster(2).await;
    let dispatcher = dispatcher(&servers).await;

    let mut ports = Vec::new();
    for _ in 0..5 {
        ports.push(dispatcher.get_handler_port().await.unwrap());
    }
    let mut unique = ports.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), ports.len());
    assert_eq!(servers.dispatcher.service().active().await, 5);

    servers.shutdown().await.unwrap();
}

#[tokio::test]
async fn coordinators_do_not_share_transactions() {
    let servers = cluster(2).await;
    let a = client(&servers).await;
    let b = client(&servers).await;

    a.write("1", "only-a").await.unwrap();
    assert_eq!(b.read("1").await.unwrap().value, SEED_VALUE);

    servers.shutdown().await.unwrap();
}

#[tokio::test]
async fn stopping_a_coordinator_releases_it() {
    let servers = cluster(2).await;
    let c = client(&servers).await;

    c.stop().await.unwrap();
    assert!(c.read("1").await.unwrap_err().is_connectivity());

    // The dispatcher keeps serving new clients.
    let other = client(&servers).await;
    assert_eq!(other.read("1").await.unwrap().value, SEED_VALUE);

    servers.shutdown().await.unwrap();
}
