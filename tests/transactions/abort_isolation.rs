//! Aborted transactions leave no trace in the store

use crate::common::*;

#[tokio::test]
async fn aborted_write_set_is_untouched() {
    let cluster = Cluster::seeded(6);
    let loser = cluster.coordinator_named("loser");
    let winner = cluster.coordinator_named("winner");

    read_then_write(&loser, "1", "L1").await;
    loser.write("2", "L2").await.unwrap();
    loser.write("3", "L3").await.unwrap();

    winner.write("1", "W1").await.unwrap();
    assert_eq!(winner.commit().await.unwrap(), Outcome::Success);

    let before: Vec<Entry> = ["1", "2", "3"].iter().map(|k| stored(&cluster, k)).collect();
    assert_eq!(loser.commit().await.unwrap(), Outcome::Abort);
    let after: Vec<Entry> = ["1", "2", "3"].iter().map(|k| stored(&cluster, k)).collect();

    assert_eq!(before, after);
}

#[tokio::test]
async fn abort_with_conflict_on_last_read_applies_nothing() {
    let cluster = Cluster::seeded(5);
    let loser = cluster.coordinator();
    let winner = cluster.coordinator();

    // Reads "1".."4" stay valid; only "5" goes stale.
    for key in ["1", "2", "3", "4", "5"] {
        loser.read(key).await.unwrap();
    }
    for key in ["1", "2", "3", "4"] {
        loser.write(key, "partial").await.unwrap();
    }

    winner.write("5", "moved").await.unwrap();
    winner.commit().await.unwrap();

    let before = cluster.store().snapshot().unwrap();
    assert_eq!(loser.commit().await.unwrap(), Outcome::Abort);
    assert_eq!(cluster.store().snapshot().unwrap(), before);
}

#[tokio::test]
async fn buffered_writes_invisible_until_commit() {
    let cluster = Cluster::seeded(2);
    let writer = cluster.coordinator();
    let reader = cluster.coordinator();

    writer.write("1", "pending").await.unwrap();
    assert_eq!(reader.read("1").await.unwrap().value, SEED_VALUE);
    assert_eq!(stored(&cluster, "1").value, SEED_VALUE);

    writer.commit().await.unwrap();
    assert_eq!(stored(&cluster, "1").value, "pending");
}

#[tokio::test]
async fn counters_record_aborts() {
    let cluster = Cluster::seeded(1);
    let loser = cluster.coordinator();
    let winner = cluster.coordinator();

    read_then_write(&loser, "1", "a").await;
    winner.write("1", "b").await.unwrap();
    winner.commit().await.unwrap();
    loser.commit().await.unwrap();

    let stats = loser.stats().await.unwrap();
    assert_eq!(stats.total_attempts, 1);
    assert_eq!(stats.successes, 0);
    assert_eq!(stats.failures(), 1);

    let validator = cluster.validator().stats().await.unwrap();
    assert_eq!(validator.total_attempts, 2);
    assert_eq!(validator.successes, 1);
}
