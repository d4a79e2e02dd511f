//! Reference scenarios

use crate::common::*;

// ============================================================================
// Stale read
// ============================================================================

#[tokio::test]
async fn stale_read_aborts_and_keeps_winner() {
    let cluster = Cluster::seeded(10);
    let v0 = stored(&cluster, "1").version;

    let txn1 = cluster.coordinator_named("txn1");
    let txn2 = cluster.coordinator_named("txn2");

    let observed = txn1.read("1").await.unwrap();
    assert_eq!(observed.version, v0);

    txn2.write("1", "99").await.unwrap();
    assert_eq!(txn2.commit().await.unwrap(), Outcome::Success);
    let v1 = stored(&cluster, "1").version;
    assert!(v1 > v0);

    txn1.write("1", "5").await.unwrap();
    assert_eq!(txn1.commit().await.unwrap(), Outcome::Abort);

    let entry = stored(&cluster, "1");
    assert_eq!(entry.value, "99");
    assert_eq!(entry.version, v1);
}

// ============================================================================
// Blind write
// ============================================================================

#[tokio::test]
async fn blind_write_always_commits() {
    let cluster = Cluster::seeded(10);
    let before = stored(&cluster, "2");

    // Other traffic on the same key does not matter without a read.
    let other = cluster.coordinator();
    other.write("2", "7").await.unwrap();
    assert_eq!(other.commit().await.unwrap(), Outcome::Success);

    let txn3 = cluster.coordinator_named("txn3");
    txn3.write("2", "42").await.unwrap();
    assert_eq!(txn3.commit().await.unwrap(), Outcome::Success);

    let after = stored(&cluster, "2");
    assert_eq!(after.value, "42");
    assert!(after.version > before.version);
}

// ============================================================================
// Disjoint transactions
// ============================================================================

#[tokio::test]
async fn disjoint_transactions_both_commit() {
    let cluster = Cluster::seeded(10);
    let a = cluster.coordinator_named("a");
    let b = cluster.coordinator_named("b");

    a.read("3").await.unwrap();
    b.read("4").await.unwrap();
    a.write("5", "a5").await.unwrap();
    b.write("6", "b6").await.unwrap();

    let (ra, rb) = tokio::join!(a.commit(), b.commit());
    assert_eq!(ra.unwrap(), Outcome::Success);
    assert_eq!(rb.unwrap(), Outcome::Success);

    assert_eq!(stored(&cluster, "5").value, "a5");
    assert_eq!(stored(&cluster, "6").value, "b6");
    assert_eq!(stored(&cluster, "3").value, SEED_VALUE);
    assert_eq!(stored(&cluster, "4").value, SEED_VALUE);
}

#[tokio::test]
async fn overlapping_reads_without_conflicting_writes_commit() {
    let cluster = Cluster::seeded(4);
    let a = cluster.coordinator();
    let b = cluster.coordinator();

    // Both read "1"; neither writes it.
    a.read("1").await.unwrap();
    b.read("1").await.unwrap();
    a.write("2", "a").await.unwrap();
    b.write("3", "b").await.unwrap();

    assert_eq!(a.commit().await.unwrap(), Outcome::Success);
    assert_eq!(b.commit().await.unwrap(), Outcome::Success);
}

// ============================================================================
// Transaction boundaries
// ============================================================================

#[tokio::test]
async fn commit_starts_a_new_transaction() {
    let cluster = Cluster::seeded(2);
    let client = cluster.coordinator();
    let intruder = cluster.coordinator();

    client.read("1").await.unwrap();
    assert_eq!(client.commit().await.unwrap(), Outcome::Success);

    // The finished transaction's read of "1" must not be validated again.
    intruder.write("1", "x").await.unwrap();
    intruder.commit().await.unwrap();

    client.write("2", "y").await.unwrap();
    assert_eq!(client.commit().await.unwrap(), Outcome::Success);
    assert_eq!(client.pending(), (0, 0));
}

#[tokio::test]
async fn empty_commit_succeeds() {
    let cluster = Cluster::seeded(1);
    let client = cluster.coordinator();
    assert_eq!(client.commit().await.unwrap(), Outcome::Success);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_attempts, 1);
    assert_eq!(stats.successes, 1);
}

#[tokio::test]
async fn missing_read_key_is_not_found() {
    let cluster = Cluster::seeded(3);
    let client = cluster.coordinator();

    let err = client.read("404").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(client.pending(), (0, 0));
}

#[tokio::test]
async fn write_to_missing_key_fails_commit_without_effect() {
    let cluster = Cluster::seeded(3);
    let before = cluster.store().snapshot().unwrap();
    let client = cluster.coordinator();

    client.write("1", "applied?").await.unwrap();
    client.write("404", "nope").await.unwrap();
    let err = client.commit().await.unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(cluster.store().snapshot().unwrap(), before);
    assert_eq!(client.pending(), (0, 0));
}
