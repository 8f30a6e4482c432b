//! Auth simulator state machine.
//!
//! ```text
//!  SignedOut ──sign_up / sign_in──▶ SignedIn ──sign_out──▶ SignedOut
//! ```
//!
//! Credentials live in the reserved `auth_users` table; the active session
//! in `auth_session`. Sign-up also creates the linked `profiles` row. The two
//! writes are independent statements: if the profile cannot be created the
//! credential still stands and the failure is logged.

use hearth_core::{Error, Result, Row, Session, Value};
use hearth_storage::{issue_token, CredentialRecord, Database};
use serde_json::json;
use tracing::{info, warn};

use crate::mutation;

/// Table holding the profile linked to each credential record.
pub const PROFILES: &str = "profiles";

fn validate(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(Error::invalid_argument("email must be a non-empty address"));
    }
    if password.is_empty() {
        return Err(Error::invalid_argument("password must not be empty"));
    }
    Ok(())
}

fn profile_row(record: &CredentialRecord) -> Row {
    let display_name = record
        .user_metadata
        .get("display_name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            record
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        });
    match json!({
        "id": record.id,
        "email": record.email,
        "display_name": display_name,
    }) {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

fn start_session(db: &mut Database, record: &CredentialRecord) -> Session {
    let session = Session {
        user: record.to_user(),
        access_token: issue_token(),
    };
    db.auth_session = Some(session.clone());
    session
}

/// Register a new principal and sign it in.
///
/// Fails with `AlreadyRegistered` (leaving every table untouched) when the
/// identifier already has credentials.
pub fn sign_up(db: &mut Database, email: &str, password: &str, metadata: Row) -> Result<Session> {
    validate(email, password)?;
    if db.find_user_by_email(email).is_some() {
        warn!(target: "hearth::auth", email = %email, "Sign-up rejected: already registered");
        return Err(Error::AlreadyRegistered {
            email: email.trim().to_string(),
        });
    }

    let record = CredentialRecord::new(email, password, metadata);
    db.auth_users.push(record.clone());

    if let Err(e) = mutation::insert(db, PROFILES, vec![profile_row(&record)]) {
        warn!(
            target: "hearth::auth",
            user_id = %record.id,
            error = %e,
            "Profile creation failed; credential kept without a profile"
        );
    }

    info!(target: "hearth::auth", user_id = %record.id, "Signed up");
    Ok(start_session(db, &record))
}

/// Check credentials and sign in.
pub fn sign_in(db: &mut Database, email: &str, password: &str) -> Result<Session> {
    let record = match db.find_user_by_email(email) {
        Some(r) if r.verify(password) => r.clone(),
        _ => {
            warn!(target: "hearth::auth", email = %email, "Sign-in rejected");
            return Err(Error::InvalidCredentials);
        }
    };
    info!(target: "hearth::auth", user_id = %record.id, "Signed in");
    Ok(start_session(db, &record))
}

/// Clear the active session, returning it.
pub fn sign_out(db: &mut Database) -> Option<Session> {
    let previous = db.auth_session.take();
    if let Some(s) = &previous {
        info!(target: "hearth::auth", user_id = %s.user.id, "Signed out");
    }
    previous
}
