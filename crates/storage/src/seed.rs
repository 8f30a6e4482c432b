//! Fixture data written on first open (or after a reseed).
//!
//! Two principals, each with a linked profile, plus a small forum and
//! journal so the application has something to render.

use hearth_core::{Row, Value};
use serde_json::json;

use crate::credentials::CredentialRecord;
use crate::database::Database;

/// Sign-in identifier of the first seeded principal.
pub const DEMO_EMAIL: &str = "demo@hearth.dev";
/// Password of the first seeded principal.
pub const DEMO_PASSWORD: &str = "hearth-demo";
/// Id of the first seeded principal and its profile.
pub const DEMO_USER_ID: &str = "00000000-0000-4000-8000-000000000001";

const MOD_EMAIL: &str = "moderator@hearth.dev";
const MOD_PASSWORD: &str = "hearth-mod";
const MOD_USER_ID: &str = "00000000-0000-4000-8000-000000000002";

const SEEDED_AT: &str = "2024-01-01T00:00:00+00:00";

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

fn metadata(display_name: &str) -> Row {
    row(json!({ "display_name": display_name }))
}

/// A database holding the fixture data, tagged with `version`.
pub fn seed_database(version: &str) -> Database {
    let mut db = Database::empty(version);

    db.auth_users = vec![
        CredentialRecord::with_id(
            DEMO_USER_ID.to_string(),
            DEMO_EMAIL,
            DEMO_PASSWORD,
            metadata("Demo Member"),
            SEEDED_AT.to_string(),
        ),
        CredentialRecord::with_id(
            MOD_USER_ID.to_string(),
            MOD_EMAIL,
            MOD_PASSWORD,
            metadata("Moderator"),
            SEEDED_AT.to_string(),
        ),
    ];

    *db.table("profiles") = vec![
        row(json!({
            "id": DEMO_USER_ID,
            "email": DEMO_EMAIL,
            "display_name": "Demo Member",
            "bio": "Just here to try things out.",
            "role": "member",
            "created_at": SEEDED_AT,
            "updated_at": SEEDED_AT,
        })),
        row(json!({
            "id": MOD_USER_ID,
            "email": MOD_EMAIL,
            "display_name": "Moderator",
            "bio": "Keeps the lights on.",
            "role": "moderator",
            "created_at": SEEDED_AT,
            "updated_at": SEEDED_AT,
        })),
    ];

    *db.table("forum_categories") = vec![
        row(json!({
            "id": "cat-general",
            "name": "General",
            "description": "Anything that does not fit elsewhere",
            "sort_order": 1,
        })),
        row(json!({
            "id": "cat-journaling",
            "name": "Journaling",
            "description": "Habits, prompts and reflections",
            "sort_order": 2,
        })),
        row(json!({
            "id": "cat-meta",
            "name": "Meta",
            "description": "Feedback about the community itself",
            "sort_order": 3,
        })),
    ];

    *db.table("posts") = vec![
        row(json!({
            "id": "post-welcome",
            "category_id": "cat-general",
            "author_id": MOD_USER_ID,
            "title": "Welcome to the community",
            "body": "Introduce yourself and say hello.",
            "pinned": true,
            "view_count": 42,
            "reply_count": 2,
            "created_at": "2024-01-02T09:00:00+00:00",
            "updated_at": "2024-01-02T09:00:00+00:00",
        })),
        row(json!({
            "id": "post-morning-pages",
            "category_id": "cat-journaling",
            "author_id": DEMO_USER_ID,
            "title": "Morning pages: does anyone stick with them?",
            "body": "Three pages every morning sounds like a lot.",
            "pinned": false,
            "view_count": 7,
            "reply_count": 1,
            "created_at": "2024-01-03T07:30:00+00:00",
            "updated_at": "2024-01-03T07:30:00+00:00",
        })),
        row(json!({
            "id": "post-prompts",
            "category_id": "cat-journaling",
            "author_id": MOD_USER_ID,
            "title": "Monthly prompt list",
            "body": "Thirty prompts for the month ahead.",
            "pinned": false,
            "view_count": 15,
            "reply_count": 0,
            "created_at": "2024-01-04T12:00:00+00:00",
            "updated_at": "2024-01-04T12:00:00+00:00",
        })),
        row(json!({
            "id": "post-dark-mode",
            "category_id": "cat-meta",
            "author_id": DEMO_USER_ID,
            "title": "Dark mode request",
            "body": "Reading late at night is rough on the eyes.",
            "pinned": false,
            "view_count": 3,
            "reply_count": 0,
            "created_at": "2024-01-05T22:15:00+00:00",
            "updated_at": "2024-01-05T22:15:00+00:00",
        })),
    ];

    *db.table("comments") = vec![
        row(json!({
            "id": "comment-1",
            "post_id": "post-welcome",
            "author_id": DEMO_USER_ID,
            "body": "Hello everyone!",
            "created_at": "2024-01-02T10:00:00+00:00",
            "updated_at": "2024-01-02T10:00:00+00:00",
        })),
        row(json!({
            "id": "comment-2",
            "post_id": "post-welcome",
            "author_id": MOD_USER_ID,
            "body": "Glad to have you here.",
            "created_at": "2024-01-02T10:05:00+00:00",
            "updated_at": "2024-01-02T10:05:00+00:00",
        })),
        row(json!({
            "id": "comment-3",
            "post_id": "post-morning-pages",
            "author_id": MOD_USER_ID,
            "body": "Start with one page and build up.",
            "created_at": "2024-01-03T08:00:00+00:00",
            "updated_at": "2024-01-03T08:00:00+00:00",
        })),
    ];

    *db.table("journal_entries") = vec![
        row(json!({
            "id": "entry-1",
            "user_id": DEMO_USER_ID,
            "title": "First entry",
            "body": "Trying this journaling thing.",
            "mood": "hopeful",
            "notes": null,
            "is_private": true,
            "created_at": "2024-01-03T21:00:00+00:00",
            "updated_at": "2024-01-03T21:00:00+00:00",
        })),
        row(json!({
            "id": "entry-2",
            "user_id": DEMO_USER_ID,
            "title": "Slow week",
            "body": "Not much happened, and that was fine.",
            "mood": "calm",
            "notes": "Remember to go outside more",
            "is_private": false,
            "created_at": "2024-01-07T20:30:00+00:00",
            "updated_at": "2024-01-07T20:30:00+00:00",
        })),
    ];

    db
}
