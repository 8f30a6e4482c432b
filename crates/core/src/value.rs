//! Row model and value comparison
//!
//! Rows are JSON objects: column name → [`Value`]. Tables never declare a
//! schema, so every comparison here has to cope with columns that are
//! absent, `null`, or of a different JSON type than their neighbours.
//!
//! ## Comparison rules
//!
//! - **Equality**: numbers compare by numeric value (`1 == 1.0`), everything
//!   else by structural JSON equality. `null` equals `null`.
//! - **Ordering**: `null` and absent values sort last in both directions.
//!   Non-null values of different JSON types order by a fixed type rank
//!   (bool < number < string < array < object).

use std::cmp::Ordering;

pub use serde_json::Value;

/// A single record: column name → value.
pub type Row = serde_json::Map<String, Value>;

/// Columns consulted by free-text search, in no particular order.
pub const SEARCH_COLUMNS: &[&str] = &[
    "title",
    "body",
    "name",
    "description",
    "display_name",
    "notes",
];

/// Column holding the row identity.
pub const ID_COLUMN: &str = "id";

/// Equality used by filters and join resolution.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x == y;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        _ => a == b,
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 5,
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x.cmp(&y);
            }
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            a.to_string().cmp(&b.to_string())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare two optional column values for sorting.
///
/// Absent and `null` values always sort after present ones, whatever the
/// direction. Two missing values compare equal so later sort keys decide.
pub fn compare_for_sort(a: Option<&Value>, b: Option<&Value>, ascending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = compare_present(x, y);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
    }
}

/// True when any of [`SEARCH_COLUMNS`] contains `needle` (already lowercased).
pub fn row_matches_search(row: &Row, needle: &str) -> bool {
    SEARCH_COLUMNS.iter().any(|column| match row.get(*column) {
        Some(Value::String(s)) => s.to_lowercase().contains(needle),
        _ => false,
    })
}

/// Returns the row's id when it is present and non-empty.
pub fn row_id(row: &Row) -> Option<&Value> {
    match row.get(ID_COLUMN) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v) => Some(v),
    }
}
