//! Fluent, awaitable query builder.
//!
//! ```text
//! client.from("posts")
//!     .select(["id", "title"])
//!     .join(JoinSpec::new("author", "author_id").from_table("profiles"))
//!     .eq("category_id", "general")
//!     .order("pinned", false)
//!     .order("created_at", false)
//!     .range(0, 19)
//!     .count()
//!     .await
//! ```
//!
//! Each call consumes the builder and returns it with one more piece of the
//! [`Intent`] filled in. Nothing runs until the builder is awaited.
//!
//! A call that does not fit the current intent (filtering an insert,
//! ordering a delete, an inverted range, a second entry point) does not
//! panic: the first such misuse is recorded and the awaited response
//! carries it as an `invalid_intent` error.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use hearth_core::{
    Error, Filter, Intent, JoinSpec, OrderClause, Output, Projection, Response, Returning, Row,
    RowMode, SelectIntent, Value,
};
use hearth_engine::Engine;
use parking_lot::Mutex;
use tracing::debug;

use crate::deferred::defer;

/// Builder for one operation against one table.
#[must_use = "a query builder does nothing until it is awaited"]
pub struct QueryBuilder {
    engine: Arc<Mutex<Engine>>,
    table: String,
    intent: Intent,
    entry_chosen: bool,
    misuse: Option<Error>,
}

impl std::fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("table", &self.table)
            .field("intent", &self.intent)
            .field("misuse", &self.misuse)
            .finish()
    }
}

impl QueryBuilder {
    pub(crate) fn new(engine: Arc<Mutex<Engine>>, table: impl Into<String>) -> Self {
        Self {
            engine,
            table: table.into(),
            intent: Intent::default(),
            entry_chosen: false,
            misuse: None,
        }
    }

    /// Table this builder targets.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Intent built so far.
    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// First recorded misuse of the chain, if any.
    pub fn misuse(&self) -> Option<&Error> {
        self.misuse.as_ref()
    }

    fn reject(mut self, reason: impl Into<String>) -> Self {
        if self.misuse.is_none() {
            let reason = reason.into();
            debug!(target: "hearth::query", table = %self.table, %reason, "Builder misuse recorded");
            self.misuse = Some(Error::invalid_intent(reason));
        }
        self
    }

    fn enter(mut self, intent: Intent) -> Self {
        if self.entry_chosen || self.intent != Intent::default() {
            let reason = format!(
                "{} cannot follow a {} chain",
                intent.kind(),
                self.intent.kind()
            );
            return self.reject(reason);
        }
        self.entry_chosen = true;
        self.intent = intent;
        self
    }

    /// Apply `f` to the select intent, or to the `returning` shape of an
    /// insert/update. Delete has neither.
    fn shape<F>(mut self, call: &str, f: F) -> Self
    where
        F: FnOnce(&mut Projection, &mut Vec<JoinSpec>, &mut RowMode),
    {
        if let Intent::Delete { .. } = self.intent {
            return self.reject(format!("{} is not supported on delete", call));
        }
        match &mut self.intent {
            Intent::Select(s) => f(&mut s.projection, &mut s.joins, &mut s.mode),
            Intent::Insert { returning, .. } | Intent::Update { returning, .. } => {
                let r = returning.get_or_insert_with(Returning::default);
                f(&mut r.projection, &mut r.joins, &mut r.mode)
            }
            Intent::Delete { .. } => {}
        }
        self
    }

    /// Apply `f` to the select intent; misuse on any mutation.
    fn select_only<F>(mut self, call: &str, f: F) -> Self
    where
        F: FnOnce(&mut SelectIntent),
    {
        if !matches!(self.intent, Intent::Select(_)) {
            let reason = format!("{} is not supported on {}", call, self.intent.kind());
            return self.reject(reason);
        }
        if let Intent::Select(s) = &mut self.intent {
            f(s);
        }
        self
    }

    // ---- projection and shape ----

    /// Return only these columns (plus join aliases). Missing columns come
    /// back as `null`.
    ///
    /// After `insert`/`update` this declares the returning shape.
    pub fn select<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let projection = Projection::columns(columns);
        self.shape("select", move |p, _, _| *p = projection)
    }

    /// Return every column (plus join aliases).
    pub fn select_all(self) -> Self {
        self.shape("select", |p, _, _| *p = Projection::All)
    }

    /// Attach a related row.
    pub fn join(self, join: JoinSpec) -> Self {
        self.shape("join", move |_, joins, _| joins.push(join))
    }

    /// Expect exactly one row: the first match, or a `not_found` error.
    pub fn single(self) -> Self {
        self.shape("single", |_, _, mode| *mode = RowMode::Single)
    }

    /// Expect at most one row: the first match, or `null` data.
    pub fn maybe_single(self) -> Self {
        self.shape("maybe_single", |_, _, mode| *mode = RowMode::MaybeSingle)
    }

    // ---- filtering ----

    /// Keep rows whose `column` equals `value`. Filters combine with AND.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Intent::Insert { .. } = self.intent {
            return self.reject("eq is not supported on insert");
        }
        let filter = Filter::eq(column, value);
        match &mut self.intent {
            Intent::Select(s) => s.filters.push(filter),
            Intent::Update { filters, .. } | Intent::Delete { filters } => filters.push(filter),
            Intent::Insert { .. } => {}
        }
        self
    }

    /// Case-insensitive substring search over the well-known text columns.
    pub fn text_search(self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.select_only("text_search", move |s| s.search = Some(term))
    }

    // ---- ordering and pagination ----

    /// Add a sort key. Earlier calls are more significant.
    pub fn order(self, column: impl Into<String>, ascending: bool) -> Self {
        let clause = if ascending {
            OrderClause::asc(column)
        } else {
            OrderClause::desc(column)
        };
        self.select_only("order", move |s| s.order.push(clause))
    }

    /// Return at most `n` rows.
    pub fn limit(self, n: usize) -> Self {
        self.select_only("limit", move |s| s.limit = Some(n))
    }

    /// Return rows `from..=to` (zero-based, inclusive).
    pub fn range(self, from: usize, to: usize) -> Self {
        if to < from {
            return self.reject(format!("range end {} is before start {}", to, from));
        }
        self.select_only("range", move |s| {
            s.offset = from;
            s.limit = Some(to - from + 1);
        })
    }

    /// Report the number of matching rows before pagination.
    pub fn count(self) -> Self {
        self.select_only("count", |s| s.count = true)
    }

    // ---- entry points ----

    /// Insert one row, or every row of a JSON array.
    pub fn insert(self, rows: Value) -> Self {
        match rows {
            Value::Object(row) => self.insert_many(vec![row]),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(row) => out.push(row),
                        other => {
                            return self.reject(format!("insert expects objects, got {}", other))
                        }
                    }
                }
                self.insert_many(out)
            }
            other => self.reject(format!("insert expects an object or array, got {}", other)),
        }
    }

    /// Insert several rows.
    pub fn insert_many(self, rows: Vec<Row>) -> Self {
        self.enter(Intent::Insert {
            rows,
            returning: None,
        })
    }

    /// Patch every row matching the filters that follow.
    pub fn update(self, patch: Value) -> Self {
        match patch {
            Value::Object(patch) => self.enter(Intent::Update {
                patch,
                filters: Vec::new(),
                returning: None,
            }),
            other => self.reject(format!("update expects an object, got {}", other)),
        }
    }

    /// Remove every row matching the filters that follow.
    pub fn delete(self) -> Self {
        self.enter(Intent::Delete {
            filters: Vec::new(),
        })
    }

    fn resolve(self) -> Response<Output> {
        if let Some(err) = self.misuse {
            return Response::err(err);
        }
        let result = self.engine.lock().execute(&self.table, self.intent);
        match result {
            Ok(resolved) => resolved.into_response(),
            Err(e) => Response::err(e),
        }
    }
}

impl IntoFuture for QueryBuilder {
    type Output = Response<Output>;
    type IntoFuture = Pin<Box<dyn Future<Output = Response<Output>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(defer(move || self.resolve()))
    }
}
