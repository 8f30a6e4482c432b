//! Auth types shared by the engine and the client surface.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Row;

/// Public face of a credential record. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Same id as the user's profile row
    pub id: String,
    /// Sign-in identifier
    pub email: String,
    /// RFC 3339 creation time
    pub created_at: String,
    /// Free-form metadata supplied at sign-up
    #[serde(default)]
    pub user_metadata: Row,
}

/// The active session. At most one exists per database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Signed-in principal
    pub user: User,
    /// Opaque bearer token, regenerated on every sign-in
    pub access_token: String,
}

/// Auth state transitions delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    /// Current state, delivered once after subscribing
    InitialSession,
    /// Sign-up or sign-in succeeded
    SignedIn,
    /// Session cleared
    SignedOut,
}

impl AuthEvent {
    /// Wire name of the event (`SIGNED_IN`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::InitialSession => "INITIAL_SESSION",
            AuthEvent::SignedIn => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
        }
    }
}

impl fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
