use std::sync::Arc;

use deadpool_sqlite::Object as SqliteObject;
use rusqlite::types::Value;
use rusqlite::{Statement, ToSql};

use super::params::Params;
use crate::error::SqlFluentError;
use crate::results::ResultSet;
use crate::types::{ConversionMode, ParamConverter, RowValues};

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlFluentError` if the value cannot be converted.
pub fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SqlFluentError> {
    let value: Value = row.get(idx).map_err(SqlFluentError::SqliteError)?;
    match value {
        Value::Null => Ok(RowValues::Null),
        Value::Integer(i) => Ok(RowValues::Int(i)),
        Value::Real(f) => Ok(RowValues::Float(f)),
        Value::Text(s) => Ok(RowValues::Text(s)),
        Value::Blob(b) => Ok(RowValues::Blob(b)),
    }
}

/// Drain a prepared statement into a [`ResultSet`].
///
/// # Errors
///
/// Returns `SqlFluentError::ExecutionError` if stepping the statement fails,
/// or a conversion error for an unreadable cell.
pub fn build_result_set(stmt: &mut Statement, params: &[Value]) -> Result<ResultSet, SqlFluentError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = column_names.len();

    let mut rows_iter = stmt
        .query(&param_refs[..])
        .map_err(|e| SqlFluentError::ExecutionError(format!("sqlite query error: {e}")))?;

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    while let Some(row) = rows_iter
        .next()
        .map_err(|e| SqlFluentError::ExecutionError(format!("sqlite fetch error: {e}")))?
    {
        let mut row_values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            row_values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Prepare and run a row-returning statement on a pooled connection.
///
/// # Errors
///
/// `PrepareError` if the backend rejects the statement text, otherwise
/// execution/conversion errors from result materialization.
pub async fn execute_select(
    conn: &SqliteObject,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlFluentError> {
    let values = Params::convert_sql_params(params, ConversionMode::Query)?.0;
    let query = query.to_string();
    conn.interact(move |conn| {
        let mut stmt = conn
            .prepare(&query)
            .map_err(|e| SqlFluentError::PrepareError(e.to_string()))?;
        build_result_set(&mut stmt, &values)
    })
    .await?
}

/// Prepare and run a DML statement, returning rows affected.
///
/// # Errors
///
/// `PrepareError` if the backend rejects the statement text,
/// `ExecutionError` if execution fails.
pub async fn execute_dml(
    conn: &SqliteObject,
    query: &str,
    params: &[RowValues],
) -> Result<usize, SqlFluentError> {
    let values = Params::convert_sql_params(params, ConversionMode::Execute)?.0;
    let query = query.to_string();
    conn.interact(move |conn| {
        let mut stmt = conn
            .prepare(&query)
            .map_err(|e| SqlFluentError::PrepareError(e.to_string()))?;
        let param_refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
        stmt.execute(&param_refs[..])
            .map_err(|e| SqlFluentError::ExecutionError(format!("sqlite execute error: {e}")))
    })
    .await?
}

/// Run statement text verbatim, no placeholder binding.
///
/// rusqlite has no non-preparing row-returning entry point, so the raw path
/// goes through batch execution and yields no rows.
///
/// # Errors
///
/// `ExecutionError` if the batch fails.
pub async fn execute_raw(conn: &SqliteObject, query: &str) -> Result<ResultSet, SqlFluentError> {
    let query = query.to_string();
    conn.interact(move |conn| {
        conn.execute_batch(&query)
            .map_err(|e| SqlFluentError::ExecutionError(format!("sqlite batch error: {e}")))
    })
    .await??;
    Ok(ResultSet::default())
}

/// Rowid assigned by the most recent successful INSERT on this connection.
///
/// # Errors
///
/// Returns a connection error if the pooled connection is gone.
pub async fn last_insert_id(conn: &SqliteObject) -> Result<i64, SqlFluentError> {
    let id = conn.interact(|conn| conn.last_insert_rowid()).await?;
    Ok(id)
}
