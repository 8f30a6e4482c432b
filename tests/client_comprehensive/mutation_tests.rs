//! Mutation tests: insert / update / delete contracts

use crate::test_utils::*;
use hearth::Value;
use serde_json::json;

#[tokio::test]
async fn insert_assigns_unique_ids_and_timestamps() {
    let client = empty_client();
    let created = client
        .from("items")
        .insert(json!([{"name": "A"}, {"name": "B"}]))
        .await;
    let rows = created.rows();
    assert_eq!(rows.len(), 2);
    assert_ne!(rows[0]["id"], rows[1]["id"]);
    for r in rows {
        let stamp = r["created_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{}", stamp);
        assert_eq!(r["created_at"], r["updated_at"]);
    }
}

#[tokio::test]
async fn duplicate_explicit_id_is_conflict() {
    let client = empty_client();
    client.from("items").insert(json!({"id": "same"})).await;
    let dup = client
        .from("items")
        .insert(json!([{"id": "other"}, {"id": "same"}]))
        .await;
    assert_eq!(dup.error_code(), Some("conflict"));

    let all = client.from("items").select(["id"]).await;
    assert_eq!(column(all.rows(), "id"), vec!["same"]);
}

#[tokio::test]
async fn update_never_rewrites_id_and_bumps_updated_at() {
    let client = empty_client();
    client
        .from("items")
        .insert(json!({"id": "i1", "name": "A", "updated_at": "2000-01-01T00:00:00+00:00"}))
        .await;

    let updated = client
        .from("items")
        .update(json!({"id": "hijack", "name": "B"}))
        .eq("id", "i1")
        .select(["id", "name", "updated_at"])
        .single()
        .await;
    let row = updated.row().unwrap();
    assert_eq!(row["id"], "i1");
    assert_eq!(row["name"], "B");
    assert_ne!(row["updated_at"], "2000-01-01T00:00:00+00:00");
}

#[tokio::test]
async fn update_with_no_match_leaves_everything() {
    let client = empty_client();
    client
        .from("items")
        .insert(json!([{"id": "x", "v": 1}, {"id": "y", "v": 2}]))
        .await;
    let before = client.from("items").select_all().await;

    let resp = client
        .from("items")
        .update(json!({"v": 99}))
        .eq("v", 3)
        .await;
    assert_eq!(resp.error_code(), Some("not_found"));

    let after = client.from("items").select_all().await;
    assert_eq!(before.rows(), after.rows());
}

#[tokio::test]
async fn delete_returns_removed_rows() {
    let client = empty_client();
    client
        .from("items")
        .insert(json!([{"id": 1, "k": "a"}, {"id": 2, "k": "b"}]))
        .await;
    let removed = client.from("items").delete().eq("k", "a").await;
    assert_eq!(column(removed.rows(), "id"), vec![&json!(1)]);

    let left = client.from("items").select(["id"]).await;
    assert_eq!(column(left.rows(), "id"), vec![&json!(2)]);
}

#[tokio::test]
async fn reserved_tables_are_not_reachable() {
    let client = empty_client();
    let resp = client
        .from("auth_users")
        .insert(json!({"email": "x@y.z"}))
        .await;
    assert_eq!(resp.error_code(), Some("invalid_intent"));
    let resp = client.from("auth_session").select_all().await;
    assert_eq!(resp.error_code(), Some("invalid_intent"));
}

#[tokio::test]
async fn insert_update_select_parity() {
    let client = hearth::Client::ephemeral().unwrap();
    let created = client
        .from("comments")
        .insert(json!({"post_id": "post-prompts", "body": "Saving these"}))
        .select(["id", "body"])
        .join(hearth::JoinSpec::new("post", "post_id").from_table("posts").columns(["title"]))
        .single()
        .await;
    let created = created.row().unwrap().clone();
    assert_eq!(created["post"]["title"], "Monthly prompt list");

    let read = client
        .from("comments")
        .select(["id", "body"])
        .join(hearth::JoinSpec::new("post", "post_id").from_table("posts").columns(["title"]))
        .eq("id", created["id"].clone())
        .maybe_single()
        .await;
    assert_eq!(read.row(), Some(&created));
    assert_ne!(created["id"], Value::Null);
}
