//! Typed column values and their binding to sqlx queries.

use chrono::NaiveDate;
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use std::cmp::Ordering;

/// A value for one column, already parsed at the request boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
    Date(NaiveDate),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn bind_to<'q>(
        &'q self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Int(n) => query.bind(*n),
            SqlValue::Text(s) => query.bind(s.as_str()),
            SqlValue::Date(d) => query.bind(*d),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            SqlValue::Null => Value::Null,
            SqlValue::Int(n) => Value::Number((*n).into()),
            SqlValue::Text(s) => Value::String(s.clone()),
            SqlValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Ordering used for ORDER BY emulation. NULL sorts as the largest value, as in PostgreSQL
    /// (last ascending, first descending).
    pub fn sort_cmp(&self, other: &SqlValue) -> Ordering {
        match (self, other) {
            (SqlValue::Int(a), SqlValue::Int(b)) => a.cmp(b),
            (SqlValue::Text(a), SqlValue::Text(b)) => a.cmp(b),
            (SqlValue::Date(a), SqlValue::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SqlValue::Int(_) => 0,
            SqlValue::Date(_) => 1,
            SqlValue::Text(_) => 2,
            SqlValue::Null => 3,
        }
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Int(n)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(d: NaiveDate) -> Self {
        SqlValue::Date(d)
    }
}

impl From<crate::model::PaymentStatus> for SqlValue {
    fn from(s: crate::model::PaymentStatus) -> Self {
        SqlValue::Text(s.as_str().to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}
