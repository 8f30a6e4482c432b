//! Snapshot persistence backends
//!
//! The whole database is persisted as one serialized snapshot under a fixed
//! storage key. A [`SnapshotStore`] only moves opaque text in and out; the
//! [`RowStore`](crate::RowStore) owns the format and the version check.
//!
//! - [`FileSnapshotStore`]: one `<key>.json` file per key, written
//!   atomically (temp file + rename)
//! - [`MemorySnapshotStore`]: process-local map, cloneable so several
//!   stores can observe the same "disk"

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hearth_core::Result;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Durable home of serialized snapshots.
pub trait SnapshotStore: Send {
    /// Read the snapshot stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the snapshot stored under `key`.
    fn save(&mut self, key: &str, data: &str) -> Result<()>;

    /// Where snapshots live, for log messages.
    fn location(&self) -> String;
}

// ============================================================================
// File-backed store
// ============================================================================

/// Stores each snapshot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the snapshot file for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Write to a temp file, sync it, then rename over the final path.
    ///
    /// If any step fails, the temp file is cleaned up and the previous
    /// snapshot stays intact.
    fn write_atomic(&self, path: &Path, data: &str) -> Result<()> {
        let temp_path = path.with_extension("json.tmp");

        if temp_path.exists() {
            warn!(target: "hearth::store", path = %temp_path.display(), "Removing stale temp file");
            let _ = fs::remove_file(&temp_path);
        }

        let written = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(data.as_bytes())?;
            file.sync_all()?;
            Ok(())
        })();

        if let Err(e) = written {
            warn!(
                target: "hearth::store",
                temp_path = %temp_path.display(),
                error = %e,
                "Write failed, cleaning up temp file"
            );
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            warn!(
                target: "hearth::store",
                temp_path = %temp_path.display(),
                error = %e,
                "Rename failed, cleaning up temp file"
            );
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(target: "hearth::store", path = %path.display(), bytes = data.len(), "Snapshot written");
        Ok(())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, data: &str) -> Result<()> {
        let path = self.path_for(key);
        self.write_atomic(&path, data)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Keeps snapshots in a shared map. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    /// Overwrite the stored text under `key` directly.
    pub fn put(&self, key: &str, data: impl Into<String>) {
        self.entries.lock().insert(key.to_string(), data.into());
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, data: &str) -> Result<()> {
        self.put(key, data);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
