//! Named procedures that bypass the generic builder path.
//!
//! A procedure receives the live database and a JSON argument object and
//! returns a JSON value. Built-ins:
//!
//! | Name | Arguments | Effect |
//! |------|-----------|--------|
//! | `increment_counter` | `{table, id, column, amount?}` | `row[column] += amount` (default 1) |
//! | `increment_view_count` | `{post_id}` | `posts.view_count += 1` |
//! | `increment_reply_count` | `{post_id}` | `posts.reply_count += 1` |

use std::collections::HashMap;
use std::sync::Arc;

use hearth_core::value::{row_id, values_equal};
use hearth_core::{Error, Result, Value};
use hearth_storage::{is_reserved, Database};
use serde_json::Number;

/// A registered procedure.
pub type Procedure = Arc<dyn Fn(&mut Database, &Value) -> Result<Value> + Send + Sync>;

/// Name → procedure table.
#[derive(Clone, Default)]
pub struct RpcDispatcher {
    procedures: HashMap<String, Procedure>,
}

impl std::fmt::Debug for RpcDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcDispatcher")
            .field("procedures", &self.names())
            .finish()
    }
}

impl RpcDispatcher {
    /// Dispatcher with no procedures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with the built-in procedures registered.
    pub fn with_builtins() -> Self {
        let mut rpc = Self::new();
        rpc.register("increment_counter", |db, args| {
            let table = arg_str(args, "table")?;
            let id = arg_value(args, "id")?;
            let column = arg_str(args, "column")?;
            let amount = match args.get("amount") {
                None | Some(Value::Null) => 1,
                Some(v) => v
                    .as_i64()
                    .ok_or_else(|| Error::invalid_argument("amount must be an integer"))?,
            };
            increment_counter(db, table, id, column, amount)
        });
        rpc.register("increment_view_count", |db, args| {
            let post_id = arg_value(args, "post_id")?;
            increment_counter(db, "posts", post_id, "view_count", 1)
        });
        rpc.register("increment_reply_count", |db, args| {
            let post_id = arg_value(args, "post_id")?;
            increment_counter(db, "posts", post_id, "reply_count", 1)
        });
        rpc
    }

    /// Register (or replace) a procedure.
    pub fn register<F>(&mut self, name: impl Into<String>, procedure: F)
    where
        F: Fn(&mut Database, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.procedures.insert(name.into(), Arc::new(procedure));
    }

    /// True when a procedure is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.procedures.keys().cloned().collect();
        names.sort();
        names
    }

    /// Run the procedure registered under `name`.
    pub fn dispatch(&self, db: &mut Database, name: &str, args: &Value) -> Result<Value> {
        let procedure = self
            .procedures
            .get(name)
            .ok_or_else(|| Error::UnknownProcedure {
                name: name.to_string(),
            })?;
        procedure(db, args)
    }
}

fn arg_value<'a>(args: &'a Value, name: &str) -> Result<&'a Value> {
    match args.get(name) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(Error::invalid_argument(format!("missing argument '{}'", name))),
    }
}

fn arg_str<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    arg_value(args, name)?
        .as_str()
        .ok_or_else(|| Error::invalid_argument(format!("argument '{}' must be a string", name)))
}

/// Add `amount` to one numeric column of the row whose id is `id`.
///
/// A missing or `null` counter counts as 0. Returns the new value.
pub fn increment_counter(
    db: &mut Database,
    table: &str,
    id: &Value,
    column: &str,
    amount: i64,
) -> Result<Value> {
    if is_reserved(table) {
        return Err(Error::invalid_argument(format!("table '{}' is reserved", table)));
    }
    let row = db
        .table(table)
        .iter_mut()
        .find(|r| row_id(r).map_or(false, |rid| values_equal(rid, id)))
        .ok_or_else(|| Error::not_found(format!("{} where id = {}", table, id)))?;

    let next = match row.get(column) {
        None | Some(Value::Null) => Value::from(amount),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Value::from(i.saturating_add(amount)),
            None => n
                .as_f64()
                .and_then(|f| Number::from_f64(f + amount as f64))
                .map(Value::Number)
                .ok_or_else(|| Error::invalid_argument(format!("{} is not a finite number", column)))?,
        },
        Some(other) => {
            return Err(Error::invalid_argument(format!(
                "{}.{} is not numeric: {}",
                table, column, other
            )))
        }
    };
    row.insert(column.to_string(), next.clone());
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn db() -> Database {
        let mut db = Database::empty("test");
        *db.table("posts") = vec![
            json!({"id": "p1", "view_count": 4}).as_object().cloned().unwrap(),
            json!({"id": "p2"}).as_object().cloned().unwrap(),
        ];
        db
    }

    #[test]
    fn test_unknown_procedure() {
        let rpc = RpcDispatcher::with_builtins();
        let err = rpc.dispatch(&mut db(), "drop_everything", &json!({})).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownProcedure {
                name: "drop_everything".into()
            }
        );
    }

    #[test]
    fn test_increment_view_count_targets_one_row() {
        let rpc = RpcDispatcher::with_builtins();
        let mut db = db();
        let out = rpc
            .dispatch(&mut db, "increment_view_count", &json!({"post_id": "p1"}))
            .unwrap();
        assert_eq!(out, json!(5));
        assert_eq!(db.rows("posts")[0]["view_count"], 5);
        assert!(!db.rows("posts")[1].contains_key("view_count"));
    }

    #[test]
    fn test_missing_counter_starts_at_zero() {
        let rpc = RpcDispatcher::with_builtins();
        let mut db = db();
        let out = rpc
            .dispatch(
                &mut db,
                "increment_counter",
                &json!({"table": "posts", "id": "p2", "column": "likes", "amount": 3}),
            )
            .unwrap();
        assert_eq!(out, json!(3));
    }

    #[test]
    fn test_increment_missing_row_is_not_found() {
        let rpc = RpcDispatcher::with_builtins();
        let err = rpc
            .dispatch(&mut db(), "increment_reply_count", &json!({"post_id": "nope"}))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_bad_arguments() {
        let rpc = RpcDispatcher::with_builtins();
        let mut db = db();
        assert!(matches!(
            rpc.dispatch(&mut db, "increment_view_count", &json!({})),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            rpc.dispatch(
                &mut db,
                "increment_counter",
                &json!({"table": "posts", "id": "p1", "column": "view_count", "amount": "lots"})
            ),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            rpc.dispatch(
                &mut db,
                "increment_counter",
                &json!({"table": "auth_users", "id": "x", "column": "n"})
            ),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_non_numeric_counter_rejected() {
        let mut db = db();
        db.table("posts")[0].insert("view_count".into(), json!("many"));
        assert!(matches!(
            increment_counter(&mut db, "posts", &json!("p1"), "view_count", 1),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_custom_procedure() {
        let mut rpc = RpcDispatcher::new();
        rpc.register("table_count", |db, _| Ok(json!(db.tables.len())));
        assert!(rpc.contains("table_count"));
        assert_eq!(rpc.dispatch(&mut db(), "table_count", &Value::Null).unwrap(), json!(1));
        assert_eq!(rpc.names(), vec!["table_count".to_string()]);
    }
}
