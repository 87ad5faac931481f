//! Binding JSON parameter values onto a sqlx query.

use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;

/// Bind one JSON value as a typed PostgreSQL parameter.
///
/// Strings are sniffed for RFC3339 timestamps and UUIDs so that encoded
/// temporal/identifier literals reach the server with their proper type;
/// numbers bind as int4 when they fit, int8 or float8 otherwise.
pub(crate) fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::String(s) => {
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                query.bind(dt.with_timezone(&chrono::Utc))
            } else if let Ok(id) = uuid::Uuid::parse_str(&s) {
                query.bind(id)
            } else {
                query.bind(s)
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                    query.bind(i as i32)
                } else {
                    query.bind(i)
                }
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::Bool(b) => query.bind(b),
        Value::Null => query.bind(Option::<String>::None),
        other => query.bind(other.to_string()),
    }
}
