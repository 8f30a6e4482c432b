//! Synchronous intent dispatch.
//!
//! The [`Engine`] owns the [`RowStore`] and the [`RpcDispatcher`]. Every
//! public operation is one synchronous critical section: resolve or mutate,
//! then persist when anything changed. The async client wraps an engine in
//! `Arc<Mutex<_>>` and never touches the store directly.

use hearth_core::{Error, Intent, Output, Result, Row, Session, User, Value};
use hearth_storage::{is_reserved, MemorySnapshotStore, RowStore, SnapshotStore};
use tracing::{debug, warn};

use crate::config::HearthConfig;
use crate::resolver::{self, Resolved};
use crate::rpc::RpcDispatcher;
use crate::{auth, mutation};

/// Owns the data and everything allowed to change it.
pub struct Engine {
    store: RowStore,
    rpc: RpcDispatcher,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", self.store.options())
            .field("loaded", &self.store.is_loaded())
            .field("rpc", &self.rpc)
            .finish()
    }
}

impl Engine {
    /// Engine over an existing store with the built-in procedures.
    pub fn new(store: RowStore) -> Self {
        Self {
            store,
            rpc: RpcDispatcher::with_builtins(),
        }
    }

    /// Engine over `backend`, configured by `config`.
    pub fn open<S: SnapshotStore + 'static>(backend: S, config: &HearthConfig) -> Result<Self> {
        let options = config.store_options()?;
        Ok(Self::new(RowStore::new(backend, options)))
    }

    /// Engine over a fresh in-memory backend with default settings.
    pub fn in_memory() -> Result<Self> {
        Self::open(MemorySnapshotStore::new(), &HearthConfig::default())
    }

    /// Underlying store.
    pub fn store(&self) -> &RowStore {
        &self.store
    }

    /// Underlying store, mutably.
    pub fn store_mut(&mut self) -> &mut RowStore {
        &mut self.store
    }

    /// Snapshot writes that failed so far.
    pub fn storage_failures(&self) -> u64 {
        self.store.storage_failures()
    }

    /// Run one intent against `table`.
    pub fn execute(&mut self, table: &str, intent: Intent) -> Result<Resolved> {
        validate_table(table)?;
        debug!(target: "hearth::query", table, kind = intent.kind(), "Executing intent");

        let db = self.store.database()?;
        let (affected, returning) = match intent {
            Intent::Select(select) => return resolver::resolve(db, table, &select),
            Intent::Insert { rows, returning } => {
                if rows.is_empty() {
                    return Err(Error::invalid_intent("insert requires at least one row"));
                }
                (mutation::insert(db, table, rows)?, returning)
            }
            Intent::Update {
                patch,
                filters,
                returning,
            } => {
                if filters.is_empty() {
                    return Err(Error::invalid_intent("update requires at least one filter"));
                }
                (mutation::update(db, table, &patch, &filters)?, returning)
            }
            Intent::Delete { filters } => {
                if filters.is_empty() {
                    return Err(Error::invalid_intent("delete requires at least one filter"));
                }
                (mutation::delete(db, table, &filters)?, None)
            }
        };

        let resolved = match &returning {
            Some(r) => resolver::reshape(db, table, &affected, &r.as_select()),
            None => Ok(Resolved {
                output: Some(Output::Rows(affected)),
                count: None,
            }),
        };
        self.store.save();
        resolved
    }

    /// Register a principal and sign it in.
    pub fn sign_up(&mut self, email: &str, password: &str, metadata: Row) -> Result<Session> {
        let session = auth::sign_up(self.store.database()?, email, password, metadata)?;
        self.store.save();
        Ok(session)
    }

    /// Sign in with an email and password.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<Session> {
        let session = auth::sign_in(self.store.database()?, email, password)?;
        self.store.save();
        Ok(session)
    }

    /// Clear the active session, returning the one that was cleared.
    pub fn sign_out(&mut self) -> Result<Option<Session>> {
        let previous = auth::sign_out(self.store.database()?);
        if previous.is_some() {
            self.store.save();
        }
        Ok(previous)
    }

    /// Active session, if any.
    pub fn session(&mut self) -> Result<Option<Session>> {
        Ok(self.store.database()?.auth_session.clone())
    }

    /// User of the active session, if any.
    pub fn user(&mut self) -> Result<Option<User>> {
        Ok(self.session()?.map(|s| s.user))
    }

    /// Invoke a named procedure.
    pub fn rpc(&mut self, name: &str, args: &Value) -> Result<Value> {
        if !self.rpc.contains(name) {
            warn!(target: "hearth::rpc", name, "Unknown procedure");
            return Err(Error::UnknownProcedure {
                name: name.to_string(),
            });
        }
        let db = self.store.database()?;
        let out = self.rpc.dispatch(db, name, args);
        match &out {
            Ok(_) => debug!(target: "hearth::rpc", name, "Procedure completed"),
            Err(e) => warn!(
                target: "hearth::rpc",
                name,
                error = %e,
                "Procedure failed; persisting whatever it changed"
            ),
        }
        // A procedure may have written before failing.
        self.store.save();
        out
    }

    /// Register (or replace) a procedure.
    pub fn register_rpc<F>(&mut self, name: impl Into<String>, procedure: F)
    where
        F: Fn(&mut hearth_storage::Database, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.rpc.register(name, procedure);
    }

    /// Names of every registered procedure.
    pub fn procedures(&self) -> Vec<String> {
        self.rpc.names()
    }
}

fn validate_table(table: &str) -> Result<()> {
    if table.trim().is_empty() {
        return Err(Error::invalid_intent("table name must not be empty"));
    }
    if is_reserved(table) {
        return Err(Error::invalid_intent(format!(
            "table '{}' is reserved for auth",
            table
        )));
    }
    Ok(())
}
