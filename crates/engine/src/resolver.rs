//! Query resolution pipeline
//!
//! Resolves a [`SelectIntent`] against one table without mutating anything:
//!
//! ```text
//! filter → search → count → sort → paginate → join → project → row mode
//! ```
//!
//! The count is taken before pagination so callers can show "page N of M"
//! while only receiving one page. Joins run after pagination, so only the
//! returned rows pay for related-row lookups.

use std::cmp::Ordering;

use hearth_core::value::{compare_for_sort, row_id, row_matches_search, values_equal};
use hearth_core::{
    Error, Filter, JoinSpec, OrderClause, Output, Projection, Response, Result, Row, RowMode,
    SelectIntent, Value,
};
use hearth_storage::Database;

/// Outcome of resolving one intent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolved {
    /// Returned rows; `None` when the call returns nothing
    pub output: Option<Output>,
    /// Total matching rows before pagination, when requested
    pub count: Option<usize>,
}

impl Resolved {
    /// Wrap into the consumer-facing envelope.
    pub fn into_response(self) -> Response<Output> {
        Response::ok(self.output).with_count(self.count)
    }
}

/// Resolve a select intent against `table`.
pub fn resolve(db: &Database, table: &str, intent: &SelectIntent) -> Result<Resolved> {
    let needle = intent
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<&Row> = db
        .rows(table)
        .iter()
        .filter(|row| Filter::matches_all(&intent.filters, row))
        .filter(|row| match &needle {
            Some(n) => row_matches_search(row, n),
            None => true,
        })
        .collect();

    let count = intent.count.then_some(matched.len());

    sort_rows(&mut matched, &intent.order);

    let page: Vec<&Row> = match intent.limit {
        Some(limit) => matched.into_iter().skip(intent.offset).take(limit).collect(),
        None => matched.into_iter().skip(intent.offset).collect(),
    };

    let shaped: Vec<Row> = page
        .into_iter()
        .map(|row| shape(db, row, &intent.projection, &intent.joins))
        .collect();

    let output = finish(shaped, intent.mode, || {
        Filter::describe(table, &intent.filters)
    })?;
    Ok(Resolved { output, count })
}

/// Push already-selected rows through the join/projection/row-mode path.
///
/// Mutations with a `returning` clause use this so their output has the
/// same shape a plain select would produce.
pub fn reshape(db: &Database, table: &str, rows: &[Row], intent: &SelectIntent) -> Result<Resolved> {
    let shaped: Vec<Row> = rows
        .iter()
        .map(|row| shape(db, row, &intent.projection, &intent.joins))
        .collect();
    let output = finish(shaped, intent.mode, || table.to_string())?;
    Ok(Resolved {
        output,
        count: None,
    })
}

/// Stable multi-key sort. Rows equal on every key keep their input order.
pub fn sort_rows(rows: &mut [&Row], order: &[OrderClause]) {
    if order.is_empty() {
        return;
    }
    rows.sort_by(|a, b| compare_rows(a, b, order));
}

fn compare_rows(a: &Row, b: &Row, order: &[OrderClause]) -> Ordering {
    for clause in order {
        let ord = compare_for_sort(a.get(&clause.column), b.get(&clause.column), clause.ascending);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn shape(db: &Database, row: &Row, projection: &Projection, joins: &[JoinSpec]) -> Row {
    let mut out = projection.apply(row);
    for join in joins {
        out.insert(join.alias.clone(), join_value(db, row, join));
    }
    out
}

/// Related row under `join.alias`, or an explicit `null`.
fn join_value(db: &Database, row: &Row, join: &JoinSpec) -> Value {
    let fk = match row.get(&join.foreign_key) {
        Some(v) if !v.is_null() => v,
        _ => return Value::Null,
    };
    db.rows(&join.table)
        .iter()
        .find(|candidate| row_id(candidate).map_or(false, |id| values_equal(id, fk)))
        .map(|related| Value::Object(join.columns.apply(related)))
        .unwrap_or(Value::Null)
}

fn finish<F>(rows: Vec<Row>, mode: RowMode, describe: F) -> Result<Option<Output>>
where
    F: FnOnce() -> String,
{
    match mode {
        RowMode::Many => Ok(Some(Output::Rows(rows))),
        RowMode::Single => rows
            .into_iter()
            .next()
            .map(|row| Some(Output::Row(row)))
            .ok_or_else(|| Error::not_found(describe())),
        RowMode::MaybeSingle => Ok(rows.into_iter().next().map(Output::Row)),
    }
}
