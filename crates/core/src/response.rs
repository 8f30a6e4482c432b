//! Response envelope handed to consumers.
//!
//! Every resolved call yields `{data, count, error}`. `error` is `None` on
//! success; on failure `data` is `None` and `error` carries the message.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::value::Row;

/// Rows produced by a resolved intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Output {
    /// A list of rows (plain select, mutation with `returning`)
    Rows(Vec<Row>),
    /// Exactly one row (single / maybe-single mode)
    Row(Row),
}

impl Output {
    /// View the output as a slice, whatever its shape.
    pub fn as_rows(&self) -> &[Row] {
        match self {
            Output::Rows(rows) => rows,
            Output::Row(row) => std::slice::from_ref(row),
        }
    }
}

/// Serializable error body: `{code, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<Error> for ErrorBody {
    fn from(err: Error) -> Self {
        ErrorBody::from(&err)
    }
}

/// `{data, count, error}` result of one awaited call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    /// Payload; `None` on error or when the call returns nothing
    pub data: Option<T>,
    /// Total matching rows before pagination, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Error body; `None` on success
    pub error: Option<ErrorBody>,
}

impl<T> Response<T> {
    /// Successful response.
    pub fn ok(data: Option<T>) -> Self {
        Self {
            data,
            count: None,
            error: None,
        }
    }

    /// Failed response.
    pub fn err(err: impl Into<ErrorBody>) -> Self {
        Self {
            data: None,
            count: None,
            error: Some(err.into()),
        }
    }

    /// Attach a total count.
    pub fn with_count(mut self, count: Option<usize>) -> Self {
        self.count = count;
        self
    }

    /// Build from an internal result.
    pub fn from_result(result: crate::Result<Option<T>>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e),
        }
    }

    /// True when `error` is `None`.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Error code, if any.
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }

    /// Convert into a `Result`, for callers that prefer `?`.
    pub fn into_result(self) -> Result<Option<T>, ErrorBody> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.data),
        }
    }
}

impl Response<Output> {
    /// Returned rows; empty on error or when nothing was returned.
    pub fn rows(&self) -> &[Row] {
        self.data.as_ref().map(Output::as_rows).unwrap_or(&[])
    }

    /// First returned row.
    pub fn row(&self) -> Option<&Row> {
        self.rows().first()
    }
}
