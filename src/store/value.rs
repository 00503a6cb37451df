use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgArguments;
use sqlx::Postgres;

/// Owned bind parameter for the fixed set of column types the managed tables
/// use. Statements are assembled from trusted identifier constants; every
/// caller-supplied value travels through here as a bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    OptText(Option<String>),
    Bool(bool),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    IntArray(Vec<i32>),
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl From<Vec<i32>> for SqlValue {
    fn from(v: Vec<i32>) -> Self {
        SqlValue::IntArray(v)
    }
}

pub fn bind_value<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlValue,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
    match v {
        SqlValue::Text(s) => q.bind(s),
        SqlValue::OptText(s) => q.bind(s.as_deref()),
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Date(d) => q.bind(*d),
        SqlValue::Timestamp(t) => q.bind(*t),
        SqlValue::IntArray(a) => q.bind(a),
    }
}

pub fn bind_value_scalar<'q, O>(
    q: sqlx::query::QueryScalar<'q, Postgres, O, PgArguments>,
    v: &'q SqlValue,
) -> sqlx::query::QueryScalar<'q, Postgres, O, PgArguments> {
    match v {
        SqlValue::Text(s) => q.bind(s),
        SqlValue::OptText(s) => q.bind(s.as_deref()),
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Date(d) => q.bind(*d),
        SqlValue::Timestamp(t) => q.bind(*t),
        SqlValue::IntArray(a) => q.bind(a),
    }
}
