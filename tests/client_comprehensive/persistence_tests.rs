//! Persistence tests: snapshot file, reopen, version mismatch policies

use crate::test_utils::*;
use hearth::{Client, HearthConfig, CONFIG_FILE_NAME};
use serde_json::{json, Value};
use tempfile::TempDir;

fn stale_snapshot() -> String {
    json!({
        "version": "hearth-v1",
        "tables": {"posts": [{"id": "old-1"}, {"id": "old-2"}]},
        "auth_users": [],
        "auth_session": null
    })
    .to_string()
}

#[tokio::test]
async fn fresh_open_writes_config_and_seeded_snapshot() {
    let (client, dir) = disk_client();
    assert!(dir.path().join(CONFIG_FILE_NAME).exists());

    // Lazy: nothing is read or written until the first call.
    assert!(!snapshot_path(&dir).exists());
    let posts = client.from("posts").select(["id"]).await;
    assert_eq!(posts.rows().len(), 4);

    let stored: Value =
        serde_json::from_str(&std::fs::read_to_string(snapshot_path(&dir)).unwrap()).unwrap();
    assert_eq!(stored["version"], "hearth-v3");
    assert_eq!(stored["tables"]["posts"].as_array().unwrap().len(), 4);
    assert!(stored["auth_session"].is_null());
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let client = Client::open(dir.path()).unwrap();
        let created = client
            .from("journal_entries")
            .insert(json!({"id": "kept", "title": "Day one"}))
            .await;
        assert!(created.is_ok());
    }

    let reopened = Client::open(dir.path()).unwrap();
    let entry = reopened
        .from("journal_entries")
        .select(["title"])
        .eq("id", "kept")
        .single()
        .await;
    assert_eq!(entry.row().unwrap()["title"], "Day one");
}

#[tokio::test]
async fn session_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let client = Client::open(dir.path()).unwrap();
        client
            .auth()
            .sign_in_with_password("demo@hearth.dev", "hearth-demo")
            .await;
    }
    let reopened = Client::open(dir.path()).unwrap();
    let user = reopened.auth().get_user().await.data.unwrap();
    assert_eq!(user.email, "demo@hearth.dev");
}

#[tokio::test]
async fn version_mismatch_reseeds_by_default() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("hearth-db.json"), stale_snapshot()).unwrap();

    let client = Client::open(dir.path()).unwrap();
    let posts = client.from("posts").select(["id"]).await;
    let ids = column(posts.rows(), "id");
    assert!(!ids.contains(&&json!("old-1")));
    assert_eq!(ids.len(), 4);

    let stored = std::fs::read_to_string(snapshot_path(&dir)).unwrap();
    assert!(stored.contains("hearth-v3"));
}

#[tokio::test]
async fn version_mismatch_refused_leaves_storage_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hearth-db.json");
    std::fs::write(&path, stale_snapshot()).unwrap();

    let config = HearthConfig {
        on_version_mismatch: "refuse".into(),
        ..HearthConfig::default()
    };
    let client = Client::open_with_config(dir.path(), config).unwrap();

    let resp = client.from("posts").select_all().await;
    assert_eq!(resp.error_code(), Some("incompatible_snapshot"));
    let insert = client.from("posts").insert(json!({"title": "x"})).await;
    assert_eq!(insert.error_code(), Some("incompatible_snapshot"));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), stale_snapshot());
}

#[tokio::test]
async fn unreadable_snapshot_is_replaced_under_reseed() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("hearth-db.json"), "{not json").unwrap();

    let client = Client::open(dir.path()).unwrap();
    let cats = client.from("forum_categories").select(["id"]).count().await;
    assert_eq!(cats.count, Some(3));
}

#[tokio::test]
async fn open_with_config_writes_config_back() {
    let dir = TempDir::new().unwrap();
    let config = HearthConfig {
        storage_key: "forum".into(),
        seed: false,
        ..HearthConfig::default()
    };
    let client = Client::open_with_config(dir.path(), config.clone()).unwrap();
    client.from("t").insert(json!({"a": 1})).await;

    assert!(dir.path().join("forum.json").exists());
    let written = HearthConfig::from_file(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(written, config);
    assert_eq!(client.storage_failures(), 0);
}

#[test]
fn open_rejects_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "on_version_mismatch = \"shrug\"\n",
    )
    .unwrap();
    let err = Client::open(dir.path()).unwrap_err();
    assert_eq!(err.code(), "config");
}
