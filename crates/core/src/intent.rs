//! Intent enum describing one query or mutation.
//!
//! An intent is the "instruction set" of Hearth: the builder accumulates one
//! and the engine resolves it. Intents are:
//! - **Tagged**: `Select | Insert | Update | Delete`, dispatched explicitly
//! - **Pure data**: no closures, serializable to JSON
//! - **Structured**: joins are [`JoinSpec`] values, never a parsed string

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::{values_equal, Row, Value};

/// One equality predicate. Filters in an intent are conjunctive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Column name
    pub column: String,
    /// Value the column must equal
    pub value: Value,
}

impl Filter {
    /// Create an equality filter.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// True when the row's column equals this filter's value.
    ///
    /// An absent column only matches a `null` filter value.
    pub fn matches(&self, row: &Row) -> bool {
        match row.get(&self.column) {
            Some(v) => values_equal(v, &self.value),
            None => self.value.is_null(),
        }
    }

    /// True when the row satisfies every filter.
    pub fn matches_all(filters: &[Filter], row: &Row) -> bool {
        filters.iter().all(|f| f.matches(row))
    }

    /// Human-readable rendering of a filter list, used in error messages.
    pub fn describe(table: &str, filters: &[Filter]) -> String {
        if filters.is_empty() {
            return table.to_string();
        }
        let parts: Vec<String> = filters.iter().map(|f| f.to_string()).collect();
        format!("{} where {}", table, parts.join(" and "))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.column, self.value)
    }
}

/// Which columns to return.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Wildcard: every column of the row
    #[default]
    All,
    /// Only the listed columns
    Columns(Vec<String>),
}

impl Projection {
    /// Projection from a column list.
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Columns(columns.into_iter().map(Into::into).collect())
    }

    /// Copy the projected columns of `row` into a new row.
    ///
    /// Listed columns missing from the row come back as `null`.
    pub fn apply(&self, row: &Row) -> Row {
        match self {
            Projection::All => row.clone(),
            Projection::Columns(cols) => cols
                .iter()
                .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
                .collect(),
        }
    }
}

/// One-level join: attach the row of `table` whose `id` equals
/// `row[foreign_key]` under `alias`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSpec {
    /// Key under which the related row is attached
    pub alias: String,
    /// Table holding the related rows
    pub table: String,
    /// Column of the parent row holding the related id
    pub foreign_key: String,
    /// Columns of the related row to attach
    pub columns: Projection,
}

impl JoinSpec {
    /// Join `alias` (also used as table name) through `foreign_key`,
    /// attaching every column.
    pub fn new(alias: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            table: alias.clone(),
            alias,
            foreign_key: foreign_key.into(),
            columns: Projection::All,
        }
    }

    /// Read related rows from a table whose name differs from the alias.
    pub fn from_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Attach only the listed columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Projection::columns(columns);
        self
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderClause {
    /// Column name
    pub column: String,
    /// Ascending when true
    pub ascending: bool,
}

impl OrderClause {
    /// Ascending sort key
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Descending sort key
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// How many rows the caller expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowMode {
    /// A list of rows
    #[default]
    Many,
    /// The first row, or `NotFound` when there is none
    Single,
    /// The first row, or no data (without an error) when there is none
    MaybeSingle,
}

/// Read intent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectIntent {
    /// Conjunctive equality filters
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Plain columns to return
    #[serde(default)]
    pub projection: Projection,
    /// Related rows to attach
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
    /// Sort keys, most significant first
    #[serde(default)]
    pub order: Vec<OrderClause>,
    /// Maximum rows returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Rows skipped before the limit applies
    #[serde(default)]
    pub offset: usize,
    /// Row cardinality expected by the caller
    #[serde(default)]
    pub mode: RowMode,
    /// Report the total matching rows before pagination
    #[serde(default)]
    pub count: bool,
    /// Free-text search term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Declared "mutate then select" state of a mutation intent.
///
/// Affected rows are re-resolved through the same projection and join path
/// as a plain select.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Returning {
    /// Plain columns to return
    #[serde(default)]
    pub projection: Projection,
    /// Related rows to attach
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
    /// Row cardinality expected by the caller
    #[serde(default)]
    pub mode: RowMode,
}

impl Returning {
    /// Select intent that resolves exactly these rows' shape.
    pub fn as_select(&self) -> SelectIntent {
        SelectIntent {
            projection: self.projection.clone(),
            joins: self.joins.clone(),
            mode: self.mode,
            ..SelectIntent::default()
        }
    }
}

/// A self-contained description of one operation against one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Read rows
    Select(SelectIntent),

    /// Append rows.
    /// Returns the inserted rows, reshaped when `returning` is set.
    Insert {
        /// Rows to insert
        rows: Vec<Row>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        /// Insert-then-select shape
        returning: Option<Returning>,
    },

    /// Patch every row matching the filters.
    Update {
        /// Columns to overwrite
        patch: Row,
        /// Conjunctive equality filters
        filters: Vec<Filter>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        /// Update-then-select shape
        returning: Option<Returning>,
    },

    /// Remove every row matching the filters.
    Delete {
        /// Conjunctive equality filters
        filters: Vec<Filter>,
    },
}

impl Intent {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Select(_) => "select",
            Intent::Insert { .. } => "insert",
            Intent::Update { .. } => "update",
            Intent::Delete { .. } => "delete",
        }
    }

    /// True for insert/update/delete.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Intent::Select(_))
    }
}

impl Default for Intent {
    fn default() -> Self {
        Intent::Select(SelectIntent::default())
    }
}
