//! Auth tests: sign-up linkage and event delivery through the public API

use crate::test_utils::*;
use hearth::{AuthEvent, Client};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn every_sign_up_has_one_linked_profile() {
    let client = empty_client();
    for (email, name) in [("a@x.dev", "Ay"), ("b@x.dev", "Bee")] {
        let resp = client
            .auth()
            .sign_up(email, "pw", json!({"display_name": name}))
            .await;
        let session = resp.data.unwrap();
        let profiles = client
            .from("profiles")
            .select(["display_name", "email"])
            .eq("id", session.user.id.clone())
            .await;
        assert_eq!(profiles.rows().len(), 1);
        assert_eq!(profiles.rows()[0]["display_name"], name);
        assert_eq!(profiles.rows()[0]["email"], email);
    }
}

#[tokio::test]
async fn email_comparison_ignores_case() {
    let client = empty_client();
    client.auth().sign_up("Case@X.dev", "pw", json!(null)).await;
    let dup = client.auth().sign_up("case@x.DEV", "pw", json!(null)).await;
    assert_eq!(dup.error_code(), Some("already_registered"));

    client.auth().sign_out().await;
    let ok = client
        .auth()
        .sign_in_with_password("CASE@x.dev", "pw")
        .await;
    assert!(ok.is_ok());
}

#[tokio::test]
async fn auto_attached_session_is_opt_in() {
    let client = Client::ephemeral().unwrap();
    assert!(client.auth().get_session().await.data.is_none());

    let config = hearth::HearthConfig {
        auto_attach_session: true,
        ..hearth::HearthConfig::default()
    };
    let client = Client::with_store(hearth::MemorySnapshotStore::new(), &config).unwrap();
    let user = client.auth().get_user().await.data.unwrap();
    assert_eq!(user.email, "demo@hearth.dev");
}

#[tokio::test]
async fn clones_share_listeners_and_session() {
    let client = empty_client();
    let other = client.clone();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let sub = client
        .auth()
        .on_auth_state_change(move |event, _| sink.lock().unwrap().push(event));
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    other.auth().sign_up("z@x.dev", "pw", json!(null)).await;
    assert!(client.auth().get_session().await.data.is_some());
    sub.unsubscribe();
    other.auth().sign_out().await;

    assert_eq!(
        *events.lock().unwrap(),
        vec![AuthEvent::InitialSession, AuthEvent::SignedIn]
    );
}
