//! Version monotonicity and read consistency

use crate::common::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

#[tokio::test]
async fn every_commit_raises_the_version() {
    let cluster = Cluster::seeded(3);
    let client = cluster.coordinator();
    let mut last = stored(&cluster, "2").version;

    for i in 0..25 {
        client.write("2", &i.to_string()).await.unwrap();
        client.commit().await.unwrap();
        let now = stored(&cluster, "2").version;
        assert!(now > last);
        last = now;
    }
}

#[tokio::test]
async fn repeated_reads_are_stable_inside_a_transaction() {
    let cluster = Cluster::seeded(2);
    let reader = cluster.coordinator();
    let writer = cluster.coordinator();

    let first = reader.read("1").await.unwrap();

    writer.write("1", "changed").await.unwrap();
    writer.commit().await.unwrap();

    let second = reader.read("1").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.value, SEED_VALUE);
}

#[tokio::test]
async fn own_writes_are_visible_and_last_one_wins() {
    let cluster = Cluster::seeded(2);
    let client = cluster.coordinator();

    client.write("1", "a").await.unwrap();
    client.write("1", "b").await.unwrap();
    assert_eq!(client.read("1").await.unwrap().value, "b");

    client.commit().await.unwrap();
    assert_eq!(stored(&cluster, "1").value, "b");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_workloads_keep_versions_monotonic(seed in any::<u64>(), clients in 1usize..4) {
        let rt = runtime();
        rt.block_on(async {
            let cluster = Cluster::seeded(4);
            let coordinators: Vec<Coordinator> = (0..clients).map(|_| cluster.coordinator()).collect();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut last: Vec<Entry> = cluster.store().snapshot().unwrap();

            for _ in 0..30 {
                let client = &coordinators[rng.gen_range(0..clients)];
                let key = rng.gen_range(1..=4).to_string();
                match rng.gen_range(0..3) {
                    0 => { client.read(&key).await.unwrap(); }
                    1 => { client.write(&key, &rng.gen_range(0..100).to_string()).await.unwrap(); }
                    _ => {
                        client.commit().await.unwrap();
                        let now = cluster.store().snapshot().unwrap();
                        for (before, after) in last.iter().zip(now.iter()) {
                            assert_eq!(before.key, after.key);
                            assert!(after.version >= before.version);
                            if after.version == before.version {
                                assert_eq!(after.value, before.value);
                            }
                        }
                        last = now;
                    }
                }
            }
        });
    }
}
