//! Client facade.
//!
//! [`Client`] is the one handle the application holds. It owns the engine
//! behind `Arc<Mutex<_>>`, so clones share the same data, the same session
//! and the same auth listeners.
//!
//! # Example
//!
//! ```text
//! use hearth::{Client, JoinSpec};
//! use serde_json::json;
//!
//! let client = Client::open("./data")?;
//!
//! let created = client
//!     .from("posts")
//!     .insert(json!({"title": "Hello", "author_id": user_id}))
//!     .select_all()
//!     .join(JoinSpec::new("author", "author_id").from_table("profiles"))
//!     .single()
//!     .await;
//!
//! client.rpc("increment_view_count", json!({"post_id": post_id})).await;
//! ```

use std::path::Path;
use std::sync::Arc;

use hearth_core::{Response, Result, Value};
use hearth_engine::{Engine, HearthConfig, CONFIG_FILE_NAME};
use hearth_storage::{Database, FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
use parking_lot::Mutex;
use tracing::info;

use crate::auth::AuthClient;
use crate::builder::QueryBuilder;
use crate::deferred::defer;

/// Handle to one embedded database.
#[derive(Clone)]
pub struct Client {
    engine: Arc<Mutex<Engine>>,
    auth: AuthClient,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("engine", &*self.engine.lock())
            .field("auth", &self.auth)
            .finish()
    }
}

impl Client {
    /// Open a database stored in `dir`.
    ///
    /// The directory is created if missing. Settings come from
    /// `dir/hearth.toml`, which is written with commented defaults on first
    /// open.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let config_path = dir.join(CONFIG_FILE_NAME);
        HearthConfig::write_default_if_missing(&config_path)?;
        let config = HearthConfig::from_file(&config_path)?;
        Self::open_dir(dir, &config)
    }

    /// Open a database stored in `dir` with an explicit config.
    ///
    /// The config is written to `dir/hearth.toml`, replacing what was there.
    pub fn open_with_config<P: AsRef<Path>>(dir: P, config: HearthConfig) -> Result<Self> {
        let dir = dir.as_ref();
        config.store_options()?;
        std::fs::create_dir_all(dir)?;
        config.write_to_file(&dir.join(CONFIG_FILE_NAME))?;
        Self::open_dir(dir, &config)
    }

    fn open_dir(dir: &Path, config: &HearthConfig) -> Result<Self> {
        let backend = FileSnapshotStore::open(dir)?;
        info!(
            target: "hearth::store",
            path = %dir.display(),
            key = %config.storage_key,
            "Opening database"
        );
        Self::with_store(backend, config)
    }

    /// Database held in process memory only, with default settings.
    pub fn ephemeral() -> Result<Self> {
        Self::with_store(MemorySnapshotStore::new(), &HearthConfig::default())
    }

    /// Database persisted to an arbitrary backend.
    pub fn with_store<S: SnapshotStore + 'static>(backend: S, config: &HearthConfig) -> Result<Self> {
        Ok(Self::with_engine(Engine::open(backend, config)?))
    }

    /// Wrap an engine that was set up by hand.
    pub fn with_engine(engine: Engine) -> Self {
        let engine = Arc::new(Mutex::new(engine));
        Self {
            auth: AuthClient::new(engine.clone()),
            engine,
        }
    }

    /// Start a builder chain against `table`.
    pub fn from(&self, table: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(self.engine.clone(), table)
    }

    /// Auth operations and event subscription.
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Invoke a named procedure.
    pub async fn rpc(&self, name: &str, args: Value) -> Response<Value> {
        let engine = self.engine.clone();
        let name = name.to_string();
        let result = defer(move || engine.lock().rpc(&name, &args)).await;
        Response::from_result(result.map(Some))
    }

    /// Register (or replace) a procedure callable through [`rpc`](Self::rpc).
    pub fn register_rpc<F>(&self, name: impl Into<String>, procedure: F)
    where
        F: Fn(&mut Database, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.engine.lock().register_rpc(name, procedure);
    }

    /// Names of every registered procedure.
    pub fn procedures(&self) -> Vec<String> {
        self.engine.lock().procedures()
    }

    /// Snapshot writes that failed so far.
    pub fn storage_failures(&self) -> u64 {
        self.engine.lock().storage_failures()
    }
}
