//! # Hearth Executor
//!
//! The async client surface of Hearth, an embedded emulation of a remote
//! relational backend client.
//!
//! This is the only crate applications need to import. It provides:
//! - [`Client`] - open a database, start builder chains, call procedures
//! - [`QueryBuilder`] - fluent select/insert/update/delete, awaited for a [`Response`]
//! - [`AuthClient`] - sign-up, sign-in, sign-out and auth events
//!
//! ## Quick Start
//!
//! ```text
//! use hearth_executor::Client;
//!
//! let client = Client::open("/path/to/data")?;
//!
//! let page = client
//!     .from("posts")
//!     .select(["id", "title"])
//!     .eq("category_id", "general")
//!     .order("created_at", false)
//!     .range(0, 9)
//!     .count()
//!     .await;
//!
//! println!("{} of {}", page.rows().len(), page.count.unwrap_or(0));
//! ```
//!
//! ## Resolution
//!
//! | Call | Resolves to |
//! |------|-------------|
//! | builder `.await` | `Response<Output>` (rows, one row, or `null`) |
//! | `client.rpc(..)` | `Response<Value>` |
//! | `auth().sign_up(..)` / `sign_in_with_password(..)` | `Response<Session>` |
//! | `auth().get_user()` | `Response<User>` |
//!
//! Every awaited call runs its work when first polled and yields to the
//! scheduler once before settling.

#![warn(missing_docs)]

mod auth;
mod builder;
mod client;
mod deferred;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use auth::{AuthCallback, AuthClient, AuthSubscription};
pub use builder::QueryBuilder;
pub use client::Client;
pub use deferred::defer;

pub use hearth_core::{
    AuthEvent, Error, ErrorBody, Filter, Intent, JoinSpec, OrderClause, Output, Projection,
    Response, Result, Returning, Row, RowMode, SelectIntent, Session, User, Value,
};
pub use hearth_engine::{Engine, HearthConfig, CONFIG_FILE_NAME};
pub use hearth_storage::{
    Database, FileSnapshotStore, MemorySnapshotStore, MismatchPolicy, SnapshotStore,
};
