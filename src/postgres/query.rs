use std::sync::Arc;

use chrono::NaiveDateTime;
use deadpool_postgres::Object as PostgresObject;
use serde_json::Value;
use tokio_postgres::SimpleQueryMessage;

use super::params::Params as PgParams;
use crate::error::SqlFluentError;
use crate::placeholders::to_numbered_placeholders;
use crate::results::ResultSet;
use crate::types::{ConversionMode, ParamConverter, RowValues};

/// Extract a `RowValues` from a `tokio_postgres` row at the given index,
/// dispatching on the column's type name.
///
/// # Errors
///
/// Returns the driver error if the cell cannot be read as the expected type.
pub fn extract_value(row: &tokio_postgres::Row, idx: usize) -> Result<RowValues, SqlFluentError> {
    let type_info = row.columns()[idx].type_();

    match type_info.name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" | "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" | "timestamptz" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        "json" | "jsonb" => {
            let val: Option<Value> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        // Everything else is read back as text
        _ => {
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
    }
}

/// Materialize driver rows into a [`ResultSet`].
///
/// # Errors
///
/// Returns errors from per-cell extraction.
pub fn build_result_set_from_rows(
    rows: &[tokio_postgres::Row],
) -> Result<ResultSet, SqlFluentError> {
    let mut result_set = ResultSet::with_capacity(rows.len());
    if let Some(row) = rows.first() {
        let cols: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
        result_set.set_column_names(Arc::new(cols));
    }

    for row in rows {
        let col_count = row.columns().len();
        let mut row_values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            row_values.push(extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Prepare and run a row-returning statement.
///
/// The builder's `?` markers are renumbered to `$1..$n` before preparation.
///
/// # Errors
///
/// `PrepareError` if the backend rejects the statement text,
/// `ExecutionError` if query execution fails.
pub async fn execute_select(
    conn: &PostgresObject,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlFluentError> {
    let sql = to_numbered_placeholders(query);
    let stmt = conn
        .prepare(sql.as_ref())
        .await
        .map_err(|e| SqlFluentError::PrepareError(e.to_string()))?;
    let converted = PgParams::convert_sql_params(params, ConversionMode::Query)?;
    let rows = conn
        .query(&stmt, converted.as_refs())
        .await
        .map_err(|e| SqlFluentError::ExecutionError(format!("postgres select error: {e}")))?;
    build_result_set_from_rows(&rows)
}

/// Prepare and run a DML statement, returning rows affected.
///
/// # Errors
///
/// `PrepareError` if the backend rejects the statement text,
/// `ExecutionError` if execution fails or the affected count does not fit.
pub async fn execute_dml(
    conn: &PostgresObject,
    query: &str,
    params: &[RowValues],
) -> Result<usize, SqlFluentError> {
    let sql = to_numbered_placeholders(query);
    let stmt = conn
        .prepare(sql.as_ref())
        .await
        .map_err(|e| SqlFluentError::PrepareError(e.to_string()))?;
    let converted = PgParams::convert_sql_params(params, ConversionMode::Execute)?;
    let rows = conn
        .execute(&stmt, converted.as_refs())
        .await
        .map_err(|e| SqlFluentError::ExecutionError(format!("postgres execute error: {e}")))?;
    usize::try_from(rows).map_err(|e| {
        SqlFluentError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
    })
}

/// Run statement text verbatim through the simple-query protocol, bypassing
/// prepare and bind entirely. Row cells come back as text.
///
/// # Errors
///
/// `ExecutionError` if the backend reports a failure.
pub async fn execute_raw(
    conn: &PostgresObject,
    query: &str,
) -> Result<ResultSet, SqlFluentError> {
    let messages = conn
        .simple_query(query)
        .await
        .map_err(|e| SqlFluentError::ExecutionError(format!("postgres raw error: {e}")))?;

    let mut result_set = ResultSet::default();
    for message in messages {
        if let SimpleQueryMessage::Row(row) = message {
            if result_set.column_names().is_none() {
                let cols: Vec<String> =
                    row.columns().iter().map(|c| c.name().to_string()).collect();
                result_set.set_column_names(Arc::new(cols));
            }
            let values = (0..row.columns().len())
                .map(|i| {
                    row.get(i)
                        .map_or(RowValues::Null, |s| RowValues::Text(s.to_string()))
                })
                .collect();
            result_set.add_row_values(values);
        }
    }
    Ok(result_set)
}

/// Identifier assigned by the most recent INSERT in this session, via
/// `lastval()`.
///
/// # Errors
///
/// `ExecutionError` if no sequence value has been generated in this session.
pub async fn last_insert_id(conn: &PostgresObject) -> Result<i64, SqlFluentError> {
    let row = conn
        .query_one("SELECT lastval()", &[])
        .await
        .map_err(|e| SqlFluentError::ExecutionError(format!("postgres lastval error: {e}")))?;
    let id: i64 = row.try_get(0)?;
    Ok(id)
}
