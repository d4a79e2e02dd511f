//! Shared helpers

pub use occkv::prelude::*;
pub use occkv::{Coordinator, VersionedStore, SEED_VALUE};
pub use std::sync::Arc;

/// Current entry for `key`, straight from the store
pub fn stored(cluster: &Cluster, key: &str) -> Entry {
    cluster.store().get(key).unwrap()
}

/// Read `key`, then write `value` to it, in the coordinator's open transaction
pub async fn read_then_write(client: &Coordinator, key: &str, value: &str) -> Entry {
    let observed = client.read(key).await.unwrap();
    client.write(key, value).await.unwrap();
    observed
}
