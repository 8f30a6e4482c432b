//! Query tests: filters, joins, ordering, pagination, search

use crate::test_utils::*;
use hearth::{Client, JoinSpec, Value};
use serde_json::json;

async fn people() -> Client {
    let client = empty_client();
    client
        .from("people")
        .insert(json!([
            {"id": "a", "team": "red",  "age": 30,   "name": "Ana"},
            {"id": "b", "team": "blue", "age": 25,   "name": "Bo"},
            {"id": "c", "team": "red",  "age": 25,   "name": "Cy"},
            {"id": "d", "team": "red",  "age": null, "name": "Di"},
            {"id": "e", "team": "blue",              "name": "Ed"},
        ]))
        .await;
    client
}

#[tokio::test]
async fn filters_are_conjunctive() {
    let client = people().await;
    let hits = client
        .from("people")
        .select(["id"])
        .eq("team", "red")
        .eq("age", 25)
        .await;
    assert_eq!(column(hits.rows(), "id"), vec!["c"]);
}

#[tokio::test]
async fn numeric_filter_ignores_representation() {
    let client = people().await;
    let hits = client.from("people").select(["id"]).eq("age", 30.0).await;
    assert_eq!(column(hits.rows(), "id"), vec!["a"]);
}

#[tokio::test]
async fn null_filter_matches_null_and_absent() {
    let client = people().await;
    let hits = client
        .from("people")
        .select(["id"])
        .eq("age", Value::Null)
        .await;
    assert_eq!(column(hits.rows(), "id"), vec!["d", "e"]);
}

#[tokio::test]
async fn nulls_sort_last_in_both_directions() {
    let client = people().await;
    let asc = client.from("people").select(["id"]).order("age", true).await;
    assert_eq!(column(asc.rows(), "id"), vec!["b", "c", "a", "d", "e"]);

    let desc = client.from("people").select(["id"]).order("age", false).await;
    assert_eq!(column(desc.rows(), "id"), vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn ties_fall_through_to_next_key() {
    let client = people().await;
    let rows = client
        .from("people")
        .select(["id"])
        .order("team", true)
        .order("name", false)
        .await;
    assert_eq!(column(rows.rows(), "id"), vec!["e", "b", "d", "c", "a"]);
}

#[tokio::test]
async fn projection_fills_missing_columns_with_null() {
    let client = people().await;
    let row = client
        .from("people")
        .select(["name", "age"])
        .eq("id", "e")
        .single()
        .await;
    let row = row.row().unwrap();
    assert_eq!(row.len(), 2);
    assert_eq!(row["age"], Value::Null);
}

#[tokio::test]
async fn pagination_past_end_is_empty_with_count() {
    let client = people().await;
    let page = client
        .from("people")
        .select_all()
        .range(10, 14)
        .count()
        .await;
    assert!(page.rows().is_empty());
    assert_eq!(page.count, Some(5));
}

#[tokio::test]
async fn seeded_forum_page_with_joins() {
    let client = hearth::Client::ephemeral().unwrap();
    let page = client
        .from("posts")
        .select(["id", "title"])
        .join(
            JoinSpec::new("author", "author_id")
                .from_table("profiles")
                .columns(["display_name"]),
        )
        .join(JoinSpec::new("category", "category_id").from_table("forum_categories"))
        .order("pinned", false)
        .order("created_at", false)
        .range(0, 1)
        .count()
        .await;

    assert_eq!(page.count, Some(4));
    let rows = page.rows();
    assert_eq!(column(rows, "id"), vec!["post-welcome", "post-dark-mode"]);
    assert_eq!(rows[0]["author"], json!({"display_name": "Moderator"}));
    assert_eq!(rows[0]["category"]["name"], "General");
    assert_eq!(rows[1]["author"], json!({"display_name": "Demo Member"}));
}

#[tokio::test]
async fn search_is_case_insensitive_or_across_columns() {
    let client = hearth::Client::ephemeral().unwrap();
    let hits = client
        .from("forum_categories")
        .select(["id"])
        .text_search("JOURNAL")
        .await;
    assert_eq!(column(hits.rows(), "id"), vec!["cat-journaling"]);

    let blank = client.from("forum_categories").select(["id"]).text_search("  ").await;
    assert_eq!(blank.rows().len(), 3);
}
