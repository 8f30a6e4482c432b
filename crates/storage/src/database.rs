//! The in-memory database and its persisted shape.
//!
//! `Database` is serialized as-is, so this struct *is* the snapshot format:
//!
//! ```text
//! {
//!   "version": "hearth-v3",
//!   "tables": { "posts": [ {...}, ... ], "profiles": [ ... ] },
//!   "auth_users": [ {id, email, password_hash, salt, created_at, user_metadata} ],
//!   "auth_session": { "user": {...}, "access_token": "..." } | null
//! }
//! ```

use std::collections::BTreeMap;

use hearth_core::{Row, Session};
use serde::{Deserialize, Serialize};

use crate::credentials::{normalize_email, CredentialRecord};

/// Table of credential records. Not reachable through the query path.
pub const AUTH_USERS: &str = "auth_users";
/// Slot of the active session. Not reachable through the query path.
pub const AUTH_SESSION: &str = "auth_session";

/// True for names that the query path must not touch.
pub fn is_reserved(table: &str) -> bool {
    table == AUTH_USERS || table == AUTH_SESSION
}

/// Table name → insertion-ordered rows, plus the auth reserve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// Schema version tag
    pub version: String,
    /// User tables
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<Row>>,
    /// Credential records
    #[serde(default)]
    pub auth_users: Vec<CredentialRecord>,
    /// Active session, if any
    #[serde(default)]
    pub auth_session: Option<Session>,
}

impl Database {
    /// A database with no tables and no users.
    pub fn empty(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            tables: BTreeMap::new(),
            auth_users: Vec::new(),
            auth_session: None,
        }
    }

    /// Live table, created empty on first reference.
    pub fn table(&mut self, name: &str) -> &mut Vec<Row> {
        self.tables.entry(name.to_string()).or_default()
    }

    /// Rows of a table; empty when the table was never referenced.
    pub fn rows(&self, name: &str) -> &[Row] {
        self.tables.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Row count per table, for diagnostics.
    pub fn table_counts(&self) -> BTreeMap<String, usize> {
        self.tables
            .iter()
            .map(|(name, rows)| (name.clone(), rows.len()))
            .collect()
    }

    /// Credential record for an identifier (case-insensitive).
    pub fn find_user_by_email(&self, email: &str) -> Option<&CredentialRecord> {
        let email = normalize_email(email);
        self.auth_users.iter().find(|u| u.email == email)
    }
}
