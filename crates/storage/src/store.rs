//! RowStore: the owned, lazily loaded database plus its persistence.
//!
//! The database is created on first access: loaded from a valid snapshot,
//! or freshly seeded and persisted at once. After that, every mutation
//! calls [`RowStore::save`], which serializes the *whole* database
//! (write-through, no batching).
//!
//! ## Version mismatch
//!
//! A stored snapshot whose version tag differs from the expected one is
//! never adopted. What happens instead is a [`MismatchPolicy`]:
//!
//! | Policy | Behavior |
//! |--------|----------|
//! | `Reseed` | Log what is discarded (version, per-table row counts), seed, persist |
//! | `Refuse` | Fail with `IncompatibleSnapshot`, leave storage untouched |
//!
//! An unreadable snapshot is handled the same way, with found version
//! reported as `<unreadable>`.

use std::collections::BTreeMap;

use hearth_core::{Error, Result, Session, Value};
use tracing::{debug, error, info, warn};

use crate::credentials::issue_token;
use crate::database::Database;
use crate::seed::seed_database;
use crate::snapshot::SnapshotStore;

/// Version tag written into every snapshot by this build.
pub const SCHEMA_VERSION: &str = "hearth-v3";

/// Storage key the snapshot lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "hearth-db";

const UNREADABLE: &str = "<unreadable>";

/// What to do with a snapshot carrying another version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Discard it, log what was lost, seed fresh data
    #[default]
    Reseed,
    /// Refuse to load until a migration step replaces it
    Refuse,
}

/// Knobs of a [`RowStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key of the persisted snapshot
    pub storage_key: String,
    /// Expected version tag
    pub schema_version: String,
    /// Version-mismatch handling
    pub mismatch_policy: MismatchPolicy,
    /// Populate fixture data when starting fresh
    pub seed: bool,
    /// Attach the first principal as the active session when none exists
    pub auto_attach_session: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            mismatch_policy: MismatchPolicy::Reseed,
            seed: true,
            auto_attach_session: false,
        }
    }
}

enum Decoded {
    Compatible(Database),
    Incompatible {
        found: String,
        tables: BTreeMap<String, usize>,
        users: usize,
    },
}

/// Owns the database and the backend it is persisted to.
pub struct RowStore {
    backend: Box<dyn SnapshotStore>,
    options: StoreOptions,
    db: Option<Database>,
    storage_failures: u64,
}

impl RowStore {
    /// Create a store. Nothing is read until the first access.
    pub fn new<S: SnapshotStore + 'static>(backend: S, options: StoreOptions) -> Self {
        Self {
            backend: Box::new(backend),
            options,
            db: None,
            storage_failures: 0,
        }
    }

    /// Options this store was created with.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// True once the database has been loaded or seeded.
    pub fn is_loaded(&self) -> bool {
        self.db.is_some()
    }

    /// Number of snapshot writes that failed so far.
    pub fn storage_failures(&self) -> u64 {
        self.storage_failures
    }

    /// The live database, loading it on first access.
    pub fn database(&mut self) -> Result<&mut Database> {
        let db = match self.db.take() {
            Some(db) => db,
            None => self.load()?,
        };
        Ok(self.db.insert(db))
    }

    /// Live table, created empty on first reference.
    pub fn table(&mut self, name: &str) -> Result<&mut Vec<hearth_core::Row>> {
        Ok(self.database()?.table(name))
    }

    /// Persist the whole database.
    ///
    /// Failures are logged and counted, never returned: a persistence
    /// hiccup must not fail the mutation that triggered it.
    pub fn save(&mut self) {
        let Some(db) = self.db.as_ref() else {
            return;
        };
        if let Err(e) = write_snapshot(self.backend.as_mut(), &self.options.storage_key, db) {
            self.storage_failures += 1;
            error!(
                target: "hearth::store",
                error = %e,
                location = %self.backend.location(),
                failures = self.storage_failures,
                "Snapshot write failed; in-memory state is ahead of storage"
            );
        }
    }

    fn load(&mut self) -> Result<Database> {
        let key = self.options.storage_key.clone();
        let expected = self.options.schema_version.clone();

        // A failed read says nothing about what is stored, so it never
        // leads to a reseed that would overwrite it.
        let stored = match self.backend.load(&key) {
            Ok(stored) => stored,
            Err(e) => {
                error!(
                    target: "hearth::store",
                    error = %e,
                    location = %self.backend.location(),
                    "Snapshot read failed"
                );
                return Err(e);
            }
        };

        let mut dirty = false;
        let mut db = match stored {
            None => {
                info!(
                    target: "hearth::store",
                    key = %key,
                    location = %self.backend.location(),
                    "No snapshot found; creating fresh database"
                );
                dirty = true;
                self.fresh()
            }
            Some(text) => match decode(&text, &expected) {
                Decoded::Compatible(db) => {
                    debug!(
                        target: "hearth::store",
                        version = %db.version,
                        tables = db.tables.len(),
                        users = db.auth_users.len(),
                        "Snapshot loaded"
                    );
                    db
                }
                Decoded::Incompatible {
                    found,
                    tables,
                    users,
                } => match self.options.mismatch_policy {
                    MismatchPolicy::Refuse => {
                        warn!(
                            target: "hearth::store",
                            expected = %expected,
                            found = %found,
                            "Refusing to load incompatible snapshot; a migration is required"
                        );
                        return Err(Error::IncompatibleSnapshot { expected, found });
                    }
                    MismatchPolicy::Reseed => {
                        warn!(
                            target: "hearth::store",
                            expected = %expected,
                            found = %found,
                            discarded_tables = ?tables,
                            discarded_users = users,
                            "Snapshot version mismatch; discarding stored data and reseeding"
                        );
                        dirty = true;
                        self.fresh()
                    }
                },
            },
        };

        if self.options.auto_attach_session && db.auth_session.is_none() {
            if let Some(first) = db.auth_users.first() {
                info!(
                    target: "hearth::store",
                    user_id = %first.id,
                    "Auto-attaching first principal as active session"
                );
                db.auth_session = Some(Session {
                    user: first.to_user(),
                    access_token: issue_token(),
                });
                dirty = true;
            }
        }

        if dirty {
            if let Err(e) = write_snapshot(self.backend.as_mut(), &key, &db) {
                self.storage_failures += 1;
                error!(
                    target: "hearth::store",
                    error = %e,
                    "Initial snapshot write failed; continuing in memory"
                );
            }
        }
        Ok(db)
    }

    fn fresh(&self) -> Database {
        if self.options.seed {
            seed_database(&self.options.schema_version)
        } else {
            Database::empty(self.options.schema_version.clone())
        }
    }
}

fn write_snapshot(backend: &mut dyn SnapshotStore, key: &str, db: &Database) -> Result<()> {
    let text = serde_json::to_string(db)?;
    backend.save(key, &text)
}

fn decode(text: &str, expected: &str) -> Decoded {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => {
            return Decoded::Incompatible {
                found: UNREADABLE.to_string(),
                tables: BTreeMap::new(),
                users: 0,
            }
        }
    };

    let found = value
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(UNREADABLE)
        .to_string();

    if found == expected {
        match serde_json::from_value::<Database>(value.clone()) {
            Ok(db) => return Decoded::Compatible(db),
            Err(_) => {
                let (tables, users) = summarize(&value);
                return Decoded::Incompatible {
                    found: UNREADABLE.to_string(),
                    tables,
                    users,
                };
            }
        }
    }

    let (tables, users) = summarize(&value);
    Decoded::Incompatible {
        found,
        tables,
        users,
    }
}

/// Per-table row counts and credential count of a raw snapshot.
fn summarize(value: &Value) -> (BTreeMap<String, usize>, usize) {
    let tables = value
        .get("tables")
        .and_then(Value::as_object)
        .map(|t| {
            t.iter()
                .map(|(name, rows)| (name.clone(), rows.as_array().map_or(0, Vec::len)))
                .collect()
        })
        .unwrap_or_default();
    let users = value
        .get("auth_users")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    (tables, users)
}
