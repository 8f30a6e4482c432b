//! Test utilities for the client comprehensive tests

use hearth::{Client, HearthConfig, MemorySnapshotStore, Row, Value};
use tempfile::TempDir;

/// Client over an empty in-memory database.
pub fn empty_client() -> Client {
    let config = HearthConfig {
        seed: false,
        ..HearthConfig::default()
    };
    Client::with_store(MemorySnapshotStore::new(), &config).unwrap()
}

/// Client over a fresh on-disk database, plus the directory keeping it alive.
pub fn disk_client() -> (Client, TempDir) {
    let dir = TempDir::new().unwrap();
    let client = Client::open(dir.path()).unwrap();
    (client, dir)
}

/// Path of the snapshot file for the default storage key.
pub fn snapshot_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("hearth-db.json")
}

/// Object value into a row.
pub fn row(value: Value) -> Row {
    value.as_object().cloned().expect("row literal must be an object")
}

static NULL: Value = Value::Null;

/// Values of one column across rows; absent columns read as `null`.
pub fn column<'a>(rows: &'a [Row], name: &str) -> Vec<&'a Value> {
    rows.iter().map(|r| r.get(name).unwrap_or(&NULL)).collect()
}
