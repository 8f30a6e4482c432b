//! Test modules for the executor crate.


use crate::{Client, HearthConfig, MemorySnapshotStore};

/// Client over an empty in-memory database.
pub(crate) fn empty_client() -> Client {
    let config = HearthConfig {
        seed: false,
        ..HearthConfig::default()
    };
    Client::with_store(MemorySnapshotStore::new(), &config).unwrap()
}

/// Client over the seeded demo database.
pub(crate) fn seeded_client() -> Client {
    Client::ephemeral().unwrap()
}
