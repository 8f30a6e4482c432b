//! Async auth surface and the auth event bus.
//!
//! Every call resolves through [`defer`](crate::deferred::defer). Listeners
//! are invoked after the engine lock has been released, so a callback may
//! freely issue further queries through a cloned client.

use std::collections::BTreeMap;
use std::sync::Arc;

use hearth_core::{AuthEvent, Error, Response, Result, Row, Session, User, Value};
use hearth_engine::Engine;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::deferred::defer;

/// Callback invoked on every auth state change.
pub type AuthCallback = Arc<dyn Fn(AuthEvent, Option<Session>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    callbacks: BTreeMap<u64, AuthCallback>,
    /// Subscribers still owed `INITIAL_SESSION` because no runtime was
    /// available to deliver it.
    owed_initial: Vec<u64>,
}

impl Listeners {
    fn snapshot(&self) -> Vec<AuthCallback> {
        self.callbacks.values().cloned().collect()
    }
}

/// Handle returned by [`AuthClient::on_auth_state_change`].
///
/// Dropping the handle does not unsubscribe; call [`unsubscribe`](Self::unsubscribe).
#[derive(Clone)]
pub struct AuthSubscription {
    id: u64,
    listeners: Arc<Mutex<Listeners>>,
}

impl std::fmt::Debug for AuthSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSubscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl AuthSubscription {
    /// Stop receiving events. Idempotent.
    pub fn unsubscribe(&self) {
        if self.listeners.lock().callbacks.remove(&self.id).is_some() {
            debug!(target: "hearth::auth", id = self.id, "Listener unsubscribed");
        }
    }

    /// True until [`unsubscribe`](Self::unsubscribe) is called.
    pub fn is_active(&self) -> bool {
        self.listeners.lock().callbacks.contains_key(&self.id)
    }
}

/// Auth half of the client.
#[derive(Clone)]
pub struct AuthClient {
    engine: Arc<Mutex<Engine>>,
    listeners: Arc<Mutex<Listeners>>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl AuthClient {
    pub(crate) fn new(engine: Arc<Mutex<Engine>>) -> Self {
        Self {
            engine,
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Number of active listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().callbacks.len()
    }

    /// Register a new principal and sign it in.
    ///
    /// `metadata` is an object (or `null`) stored with the credential; its
    /// `display_name` seeds the linked profile row.
    pub async fn sign_up(&self, email: &str, password: &str, metadata: Value) -> Response<Session> {
        self.deliver_owed_initial();
        let engine = self.engine.clone();
        let (email, password) = (email.to_string(), password.to_string());
        let result = defer(move || {
            let metadata = metadata_row(metadata)?;
            engine.lock().sign_up(&email, &password, metadata)
        })
        .await;
        self.settle(result, AuthEvent::SignedIn)
    }

    /// Sign in with an email and password.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Response<Session> {
        self.deliver_owed_initial();
        let engine = self.engine.clone();
        let (email, password) = (email.to_string(), password.to_string());
        let result = defer(move || engine.lock().sign_in(&email, &password)).await;
        self.settle(result, AuthEvent::SignedIn)
    }

    /// Clear the active session.
    ///
    /// `SIGNED_OUT` fires even when nobody was signed in.
    pub async fn sign_out(&self) -> Response<()> {
        self.deliver_owed_initial();
        let engine = self.engine.clone();
        match defer(move || engine.lock().sign_out()).await {
            Ok(_) => {
                self.emit(AuthEvent::SignedOut, None);
                Response::ok(None)
            }
            Err(e) => Response::err(e),
        }
    }

    /// Active session, as `null` data when signed out.
    pub async fn get_session(&self) -> Response<Session> {
        self.deliver_owed_initial();
        let engine = self.engine.clone();
        Response::from_result(defer(move || engine.lock().session()).await)
    }

    /// User of the active session, as `null` data when signed out.
    pub async fn get_user(&self) -> Response<User> {
        self.deliver_owed_initial();
        let engine = self.engine.clone();
        Response::from_result(defer(move || engine.lock().user()).await)
    }

    /// Subscribe to auth state changes.
    ///
    /// The callback receives `INITIAL_SESSION` with the current session
    /// shortly after this returns, never before.
    ///
    /// Delivery is spawned on the current Tokio runtime. Called outside a
    /// runtime, the event is held back and delivered when the next auth call
    /// on this client (or a clone) is first polled, ahead of that call's own
    /// event.
    pub fn on_auth_state_change<F>(&self, callback: F) -> AuthSubscription
    where
        F: Fn(AuthEvent, Option<Session>) + Send + Sync + 'static,
    {
        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.callbacks.insert(id, Arc::new(callback));
            id
        };
        debug!(target: "hearth::auth", id, "Listener subscribed");

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let engine = self.engine.clone();
                let listeners = self.listeners.clone();
                handle.spawn(async move {
                    tokio::task::yield_now().await;
                    let callback = listeners.lock().callbacks.get(&id).cloned();
                    let Some(callback) = callback else {
                        return;
                    };
                    let session = match engine.lock().session() {
                        Ok(session) => session,
                        Err(e) => {
                            warn!(target: "hearth::auth", error = %e, "Initial session unavailable");
                            None
                        }
                    };
                    callback(AuthEvent::InitialSession, session);
                });
            }
            Err(_) => {
                debug!(
                    target: "hearth::auth",
                    id,
                    "No Tokio runtime; INITIAL_SESSION held for the next auth call"
                );
                self.listeners.lock().owed_initial.push(id);
            }
        }

        AuthSubscription {
            id,
            listeners: self.listeners.clone(),
        }
    }

    fn deliver_owed_initial(&self) {
        let owed: Vec<AuthCallback> = {
            let mut listeners = self.listeners.lock();
            let ids = std::mem::take(&mut listeners.owed_initial);
            ids.iter()
                .filter_map(|id| listeners.callbacks.get(id).cloned())
                .collect()
        };
        if owed.is_empty() {
            return;
        }
        let session = match self.engine.lock().session() {
            Ok(session) => session,
            Err(e) => {
                warn!(target: "hearth::auth", error = %e, "Initial session unavailable");
                None
            }
        };
        for callback in owed {
            callback(AuthEvent::InitialSession, session.clone());
        }
    }

    fn settle(&self, result: Result<Session>, event: AuthEvent) -> Response<Session> {
        match result {
            Ok(session) => {
                self.emit(event, Some(session.clone()));
                Response::ok(Some(session))
            }
            Err(e) => Response::err(e),
        }
    }

    fn emit(&self, event: AuthEvent, session: Option<Session>) {
        let callbacks = self.listeners.lock().snapshot();
        debug!(target: "hearth::auth", %event, listeners = callbacks.len(), "Emitting auth event");
        for callback in callbacks {
            callback(event, session.clone());
        }
    }
}

fn metadata_row(metadata: Value) -> Result<Row> {
    match metadata {
        Value::Null => Ok(Row::new()),
        Value::Object(row) => Ok(row),
        other => Err(Error::invalid_argument(format!(
            "user metadata must be an object, got {}",
            other
        ))),
    }
}
