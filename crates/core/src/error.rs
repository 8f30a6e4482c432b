//! Error types for Hearth
//!
//! All errors are values: the engine never panics or unwinds across the
//! await boundary for an expected condition. Internally every layer returns
//! [`Result`]; the executor turns an [`Error`] into the `{message}` body of a
//! response via [`ErrorBody`](crate::ErrorBody).
//!
//! # Categories
//!
//! | Category | Variants | Description |
//! |----------|----------|-------------|
//! | Not Found | `NotFound` | Single-row select, update or delete matched nothing |
//! | Auth | `AlreadyRegistered`, `InvalidCredentials` | Sign-up / sign-in failures |
//! | RPC | `UnknownProcedure`, `InvalidArgument` | Bad procedure name or arguments |
//! | Intent | `InvalidIntent`, `Conflict` | Misused builder chain, duplicate id |
//! | System | `StorageFailure`, `IncompatibleSnapshot`, `Serialization`, `Config` | Infrastructure |

use serde::{Deserialize, Serialize};

/// Result type alias for Hearth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by every layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Not Found ====================
    /// No row matched where at least one was required
    #[error("not found: {entity}")]
    NotFound {
        /// What was looked for (table plus filter summary)
        entity: String,
    },

    // ==================== Auth ====================
    /// Sign-up with an identifier that already has credentials
    #[error("user already registered: {email}")]
    AlreadyRegistered {
        /// The duplicate identifier
        email: String,
    },

    /// Sign-in with an unknown identifier or a wrong password
    #[error("invalid login credentials")]
    InvalidCredentials,

    // ==================== RPC ====================
    /// No procedure registered under this name
    #[error("unknown procedure: {name}")]
    UnknownProcedure {
        /// Requested procedure name
        name: String,
    },

    /// Procedure arguments are missing or of the wrong shape
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong
        reason: String,
    },

    // ==================== Intent ====================
    /// Malformed builder chain (programmer error)
    #[error("invalid intent: {reason}")]
    InvalidIntent {
        /// What was wrong
        reason: String,
    },

    /// Write would violate row identity
    #[error("conflict: {reason}")]
    Conflict {
        /// What collided
        reason: String,
    },

    // ==================== System ====================
    /// Snapshot could not be serialized or written
    #[error("storage failure: {reason}")]
    StorageFailure {
        /// Underlying cause
        reason: String,
    },

    /// Stored snapshot carries a different schema version and the
    /// configured policy refuses to discard it
    #[error("incompatible snapshot: expected version {expected}, found {found}")]
    IncompatibleSnapshot {
        /// Version the engine expects
        expected: String,
        /// Version found in storage
        found: String,
    },

    /// Serialization error
    #[error("serialization error: {reason}")]
    Serialization {
        /// Underlying cause
        reason: String,
    },

    /// Configuration could not be read or is invalid
    #[error("configuration error: {reason}")]
    Config {
        /// Underlying cause
        reason: String,
    },
}

impl Error {
    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>) -> Self {
        Error::NotFound {
            entity: entity.into(),
        }
    }

    /// Create an InvalidIntent error
    pub fn invalid_intent(reason: impl Into<String>) -> Self {
        Error::InvalidIntent {
            reason: reason.into(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a StorageFailure error
    pub fn storage(reason: impl Into<String>) -> Self {
        Error::StorageFailure {
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::AlreadyRegistered { .. } => "already_registered",
            Error::InvalidCredentials => "invalid_credentials",
            Error::UnknownProcedure { .. } => "unknown_procedure",
            Error::InvalidArgument { .. } => "invalid_argument",
            Error::InvalidIntent { .. } => "invalid_intent",
            Error::Conflict { .. } => "conflict",
            Error::StorageFailure { .. } => "storage_failure",
            Error::IncompatibleSnapshot { .. } => "incompatible_snapshot",
            Error::Serialization { .. } => "serialization",
            Error::Config { .. } => "config",
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            reason: e.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::StorageFailure {
            reason: e.to_string(),
        }
    }
}
