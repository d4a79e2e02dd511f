//! Many clients at once

use crate::common::*;
use std::collections::HashSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn conflicting_writers_at_most_one_wins() {
    for _round in 0..10 {
        let cluster = Cluster::seeded(1);
        let clients: Vec<Arc<Coordinator>> = (0..8).map(|_| Arc::new(cluster.coordinator())).collect();

        // Everyone observes the same version before anyone commits.
        for (i, client) in clients.iter().enumerate() {
            read_then_write(client, "1", &format!("c{}", i)).await;
        }

        let mut tasks = Vec::new();
        for client in &clients {
            let client = Arc::clone(client);
            tasks.push(tokio::spawn(async move { client.commit().await.unwrap() }));
        }

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap().is_success() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn disjoint_clients_never_abort() {
    let cluster = Cluster::seeded(16);
    let mut tasks = Vec::new();

    for i in 1..=16 {
        let client = cluster.coordinator();
        tasks.push(tokio::spawn(async move {
            let key = i.to_string();
            let mut outcomes = Vec::new();
            for round in 0..20 {
                let entry = client.read(&key).await.unwrap();
                let next = entry.value.parse::<u64>().unwrap() + 1;
                client.write(&key, &next.to_string()).await.unwrap();
                outcomes.push(client.commit().await.unwrap());
                assert_eq!(next, round + 1);
            }
            outcomes
        }));
    }

    for task in tasks {
        assert!(task.await.unwrap().iter().all(|o| o.is_success()));
    }
    for entry in cluster.store().snapshot().unwrap() {
        assert_eq!(entry.value, "20");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn counter_increments_are_never_lost() {
    let cluster = Cluster::seeded(1);
    let mut tasks = Vec::new();

    for _ in 0..6 {
        let client = cluster.coordinator();
        tasks.push(tokio::spawn(async move {
            let mut committed = 0u64;
            for _ in 0..15 {
                let entry = client.read("1").await.unwrap();
                let next = entry.value.parse::<u64>().unwrap() + 1;
                client.write("1", &next.to_string()).await.unwrap();
                if client.commit().await.unwrap().is_success() {
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

    // Every successful commit added exactly one, whatever the interleaving.
    let value: u64 = stored(&cluster, "1").value.parse().unwrap();
    assert_eq!(value, total);
    assert!(total >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn versions_are_unique_across_concurrent_commits() {
    let cluster = Cluster::seeded(8);
    let mut tasks = Vec::new();

    for i in 1..=8 {
        let client = cluster.coordinator();
        tasks.push(tokio::spawn(async move {
            client.write(&i.to_string(), "w").await.unwrap();
            client.commit().await.unwrap()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), Outcome::Success);
    }

    let versions: HashSet<Version> = cluster
        .store()
        .snapshot()
        .unwrap()
        .into_iter()
        .map(|e| e.version)
        .collect();
    assert_eq!(versions.len(), 8);
}
