//! Hearth - embedded emulation of a remote relational backend client
//!
//! Hearth gives a forum/journal application the client it would use against
//! a hosted Postgres-style backend, running entirely in-process: tables of
//! JSON rows, a fluent awaitable query builder, a small auth simulator and
//! named procedures, all persisted as one versioned snapshot.
//!
//! # Quick Start
//!
//! ```ignore
//! use hearth::Client;
//! use serde_json::json;
//!
//! let client = Client::ephemeral()?;
//!
//! let created = client.from("items").insert(json!({"name": "A"})).await;
//! let id = created.rows()[0]["id"].clone();
//!
//! let item = client.from("items").select_all().eq("id", id).single().await;
//! ```
//!
//! # Architecture
//!
//! All calls go through the [`Client`], which owns an [`Engine`] behind a
//! mutex. The engine resolves one intent at a time synchronously; the
//! client turns that into futures that yield once before settling.
//!
//! Internal layers (storage, resolver, mutation) are reachable through their
//! own crates but only the client API is re-exported here.

// Re-export the public API from hearth-executor
pub use hearth_executor::*;
