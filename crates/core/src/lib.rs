//! Core types for Hearth
//!
//! This crate defines the foundational types used throughout the system:
//! - Value / Row: JSON-shaped row model and comparison helpers
//! - Error: Error taxonomy shared by every layer
//! - Auth: User, Session and AuthEvent
//! - Intent: Tagged description of one query or mutation
//! - Response: The `{data, count, error}` envelope handed to consumers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod error;
pub mod intent;
pub mod response;
pub mod value;

pub use auth::{AuthEvent, Session, User};
pub use error::{Error, Result};
pub use intent::{
    Filter, Intent, JoinSpec, OrderClause, Projection, Returning, RowMode, SelectIntent,
};
pub use response::{ErrorBody, Output, Response};
pub use value::{Row, Value, ID_COLUMN, SEARCH_COLUMNS};
