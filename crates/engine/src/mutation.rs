//! Insert / update / delete against a [`Database`].
//!
//! These functions only touch memory. The [`Engine`](crate::Engine) persists
//! after every successful call, so no caller can observe a mutation that
//! has not been handed to storage.

use hearth_core::value::{row_id, values_equal, ID_COLUMN};
use hearth_core::{Error, Filter, Result, Row, Value};
use hearth_storage::Database;

/// Column stamped with the creation time.
pub const CREATED_AT: &str = "created_at";
/// Column stamped with the last modification time.
pub const UPDATED_AT: &str = "updated_at";

fn now() -> Value {
    Value::String(chrono::Utc::now().to_rfc3339())
}

/// Append rows to `table`.
///
/// Rows without an id get a UUID v4. Missing timestamps are stamped with
/// the current time. The batch is validated as a whole first: a duplicate
/// explicit id rejects every row with `Conflict`.
pub fn insert(db: &mut Database, table: &str, rows: Vec<Row>) -> Result<Vec<Row>> {
    let existing = db.table(table);
    let mut seen: Vec<&Value> = Vec::new();
    for row in &rows {
        if let Some(id) = row_id(row) {
            let taken = existing
                .iter()
                .any(|r| row_id(r).map_or(false, |other| values_equal(other, id)));
            if taken || seen.iter().any(|other| values_equal(other, id)) {
                return Err(Error::Conflict {
                    reason: format!("duplicate id {} in {}", id, table),
                });
            }
            seen.push(id);
        }
    }

    let stamp = now();
    let prepared: Vec<Row> = rows
        .into_iter()
        .map(|mut row| {
            if row_id(&row).is_none() {
                row.insert(
                    ID_COLUMN.to_string(),
                    Value::String(uuid::Uuid::new_v4().to_string()),
                );
            }
            row.entry(CREATED_AT).or_insert_with(|| stamp.clone());
            row.entry(UPDATED_AT).or_insert_with(|| stamp.clone());
            row
        })
        .collect();

    existing.extend(prepared.iter().cloned());
    Ok(prepared)
}

/// Apply `patch` to every row matching `filters`.
///
/// The `id` column is never rewritten. Returns the updated rows, or
/// `NotFound` when nothing matched.
pub fn update(db: &mut Database, table: &str, patch: &Row, filters: &[Filter]) -> Result<Vec<Row>> {
    let stamp = now();
    let mut updated = Vec::new();
    for row in db.table(table).iter_mut() {
        if !Filter::matches_all(filters, row) {
            continue;
        }
        for (column, value) in patch {
            if column != ID_COLUMN {
                row.insert(column.clone(), value.clone());
            }
        }
        row.insert(UPDATED_AT.to_string(), stamp.clone());
        updated.push(row.clone());
    }

    if updated.is_empty() {
        return Err(Error::not_found(Filter::describe(table, filters)));
    }
    Ok(updated)
}

/// Remove every row matching `filters`.
///
/// Returns the removed rows, or `NotFound` when nothing matched.
pub fn delete(db: &mut Database, table: &str, filters: &[Filter]) -> Result<Vec<Row>> {
    let rows = db.table(table);
    let (removed, kept): (Vec<Row>, Vec<Row>) = std::mem::take(rows)
        .into_iter()
        .partition(|row| Filter::matches_all(filters, row));
    *rows = kept;

    if removed.is_empty() {
        return Err(Error::not_found(Filter::describe(table, filters)));
    }
    Ok(removed)
}
