//! Credential records kept in the reserved `auth_users` table.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hearth_core::{Row, User};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One registered principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// User id; the linked profile row has the same id
    pub id: String,
    /// Normalized sign-in identifier
    pub email: String,
    /// base64(SHA-256(salt ":" password))
    pub password_hash: String,
    /// Per-record random salt
    pub salt: String,
    /// RFC 3339 creation time
    pub created_at: String,
    /// Metadata supplied at sign-up
    #[serde(default)]
    pub user_metadata: Row,
}

impl CredentialRecord {
    /// Create a record with a fresh id and salt.
    pub fn new(email: &str, password: &str, user_metadata: Row) -> Self {
        Self::with_id(
            uuid::Uuid::new_v4().to_string(),
            email,
            password,
            user_metadata,
            chrono::Utc::now().to_rfc3339(),
        )
    }

    /// Create a record with a fixed id and creation time (seed data).
    pub fn with_id(
        id: String,
        email: &str,
        password: &str,
        user_metadata: Row,
        created_at: String,
    ) -> Self {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        Self {
            id,
            email: normalize_email(email),
            password_hash: hash_password(&salt, password),
            salt,
            created_at,
            user_metadata,
        }
    }

    /// Check a candidate password against the stored hash.
    pub fn verify(&self, password: &str) -> bool {
        hash_password(&self.salt, password) == self.password_hash
    }

    /// Public view of this record.
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            created_at: self.created_at.clone(),
            user_metadata: self.user_metadata.clone(),
        }
    }
}

/// Identifiers compare case-insensitively, ignoring surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Fresh opaque session token.
pub fn issue_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Salted password digest.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    STANDARD.encode(hasher.finalize())
}
