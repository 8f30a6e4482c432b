//! Storage layer for Hearth
//!
//! This crate owns the data at rest:
//! - Database: table registry plus the reserved auth entries (also the snapshot format)
//! - RowStore: lazy load, version check, write-through save
//! - SnapshotStore: file and in-memory persistence backends
//! - Seed: fixture data for a fresh database

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod credentials;
pub mod database;
pub mod seed;
pub mod snapshot;
pub mod store;

pub use credentials::{issue_token, normalize_email, CredentialRecord};
pub use database::{is_reserved, Database, AUTH_SESSION, AUTH_USERS};
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use store::{MismatchPolicy, RowStore, StoreOptions, DEFAULT_STORAGE_KEY, SCHEMA_VERSION};
