//! Query and mutation engine for Hearth
//!
//! This crate sits on top of the row store and implements everything that
//! reads or changes data:
//! - Resolver: filter, search, count, sort, paginate, join, project
//! - Mutation: insert / update / delete with id and timestamp stamping
//! - Auth: sign-up, sign-in and sign-out over the reserved auth tables
//! - RPC: named procedures such as counter increments
//! - Config: `hearth.toml`
//!
//! [`Engine`] ties them together behind one synchronous entry point.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod engine;
pub mod mutation;
pub mod resolver;
pub mod rpc;

pub use config::{HearthConfig, CONFIG_FILE_NAME};
pub use engine::Engine;
pub use resolver::Resolved;
pub use rpc::{Procedure, RpcDispatcher};
