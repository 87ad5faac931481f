//! Row decoding.
//!
//! This layer is schema-less, so executed rows surface as JSON objects with
//! one entry per column. Decoding dispatches on the column's PostgreSQL
//! type; anything outside the supported set falls back to a text read and
//! surfaces a `RowDecode` error when the server cannot deliver it as text.

use crate::errors::RepoError;
use serde_json::{Map, Value};
use sqlx::postgres::{PgColumn, PgRow};
use sqlx::{Column, Row, TypeInfo};

/// Convert a batch of rows into JSON objects
pub fn rows_to_values(rows: &[PgRow]) -> Result<Vec<Value>, RepoError> {
    rows.iter().map(row_to_value).collect()
}

/// Convert one row into a JSON object keyed by column name
pub fn row_to_value(row: &PgRow) -> Result<Value, RepoError> {
    let mut object = Map::with_capacity(row.columns().len());

    for column in row.columns() {
        object.insert(column.name().to_string(), decode_column(row, column)?);
    }

    Ok(Value::Object(object))
}

fn decode_column(row: &PgRow, column: &PgColumn) -> Result<Value, RepoError> {
    let index = column.ordinal();
    let wrap = |source: sqlx::Error| RepoError::row_decode(column.name(), source);

    let value = match column.type_info().name() {
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .map_err(wrap)?
            .map(Value::Bool),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .map_err(wrap)?
            .map(Value::from),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .map_err(wrap)?
            .map(Value::from),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .map_err(wrap)?
            .map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .map_err(wrap)?
            .map(|v| Value::from(f64::from(v))),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)
            .map_err(wrap)?
            .map(Value::from),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(index)
            .map_err(wrap)?
            .map(|v| Value::String(v.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .map_err(wrap)?
            .map(|v| Value::String(v.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .map_err(wrap)?
            .map(|v| Value::String(v.to_string())),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)
            .map_err(wrap)?
            .map(|v| Value::String(v.to_string())),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index).map_err(wrap)?,
        _ => row
            .try_get::<Option<String>, _>(index)
            .map_err(wrap)?
            .map(Value::String),
    };

    Ok(value.unwrap_or(Value::Null))
}
