//! Transactions through remote coordinators

use crate::common::*;

#[tokio::test]
async fn stale_read_aborts_over_the_wire() {
    let servers = cluster(10).await;
    let txn1 = client(&servers).await;
    let txn2 = client(&servers).await;

    let v0 = txn1.read("1").await.unwrap().version;

    txn2.write("1", "99").await.unwrap();
    assert_eq!(txn2.commit().await.unwrap(), Outcome::Success);

    txn1.write("1", "5").await.unwrap();
    assert_eq!(txn1.commit().await.unwrap(), Outcome::Abort);

    let entry = servers.store.service().get("1").unwrap();
    assert_eq!(entry.value, "99");
    assert!(entry.version > v0);

    servers.shutdown().await.unwrap();
}

#[tokio::test]
async fn blind_and_disjoint_writes_commit() {
    let servers = cluster(10).await;
    let a = client(&servers).await;
    let b = client(&servers).await;

    a.write("2", "42").await.unwrap();
    assert_eq!(a.commit().await.unwrap(), Outcome::Success);

    a.read("3").await.unwrap();
    b.read("4").await.unwrap();
    a.write("5", "a").await.unwrap();
    b.write("6", "b").await.unwrap();
    let (ra, rb) = tokio::join!(a.commit(), b.commit());
    assert_eq!(ra.unwrap(), Outcome::Success);
    assert_eq!(rb.unwrap(), Outcome::Success);

    let entries = a.read_all().await.unwrap();
    let value = |k: &str| entries.iter().find(|e| e.key == k).unwrap().value.clone();
    assert_eq!(value("2"), "42");
    assert_eq!(value("5"), "a");
    assert_eq!(value("6"), "b");

    servers.shutdown().await.unwrap();
}

#[tokio::test]
async fn read_your_own_writes_remotely() {
    let servers = cluster(3).await;
    let c = client(&servers).await;

    c.write("1", "mine").await.unwrap();
    assert_eq!(c.read("1").await.unwrap().value, "mine");
    assert_eq!(servers.store.service().get("1").unwrap().value, SEED_VALUE);

    c.commit().await.unwrap();
    assert_eq!(servers.store.service().get("1").unwrap().value, "mine");

    servers.shutdown().await.unwrap();
}

#[tokio::test]
async fn errors_keep_their_kind_across_hops() {
    let servers = cluster(2).await;
    let c = client(&servers).await;

    // Coordinator -> store -> coordinator -> client
    let err = c.read("404").await.unwrap_err();
    assert_eq!(err, Error::not_found("404"));

    // Coordinator -> validator -> store -> validator -> coordinator -> client
    c.write("404", "x").await.unwrap();
    assert!(c.commit().await.unwrap_err().is_not_found());

    servers.shutdown().await.unwrap();
}

#[tokio::test]
async fn stats_are_reported_per_coordinator_and_validator() {
    let servers = cluster(2).await;
    let a = client(&servers).await;
    let b = client(&servers).await;

    a.read("1").await.unwrap();
    b.read("1").await.unwrap();
    a.write("1", "a").await.unwrap();
    b.write("1", "b").await.unwrap();
    a.commit().await.unwrap();
    b.commit().await.unwrap();

    assert_eq!(a.stats().await.unwrap().successes, 1);
    let b_stats = b.stats().await.unwrap();
    assert_eq!(b_stats.total_attempts, 1);
    assert_eq!(b_stats.successes, 0);

    let validator = RemoteValidator::connect(&servers.validator.local_addr().to_string())
        .await
        .unwrap();
    let stats = validator.stats().await.unwrap();
    assert_eq!(stats.total_attempts, 2);
    assert_eq!(stats.successes, 1);

    servers.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_remote_clients_lose_no_increments() {
    let servers = cluster(1).await;
    let mut tasks = Vec::new();

    for _ in 0..4 {
        let c = client(&servers).await;
        tasks.push(tokio::spawn(async move {
            let mut committed = 0u64;
            for _ in 0..10 {
                let entry = c.read("1").await.unwrap();
                let next = entry.value.parse::<u64>().unwrap() + 1;
                c.write("1", &next.to_string()).await.unwrap();
                if c.commit().await.unwrap().is_success() {
                    committed += 1;
                }
            }
            committed
        }));
    }

    let mut total = 0;
    for task in tasks {
        total += task.await.unwrap();
    }
    let value: u64 = servers.store.service().get("1").unwrap().value.parse().unwrap();
    assert_eq!(value, total);

    servers.shutdown().await.unwrap();
}
