//! Terminal dispatch: one capability surface over both backends.
//!
//! The [`DriverAdapter`] trait is the uniform contract (prepare + bind +
//! execute + fetch, raw execution, last-insert-id); [`DriverConnection`]
//! implements it by delegating into the backend modules. The dispatch
//! helpers sitting on top enforce the placeholder/parameter alignment
//! invariant and the optional statement timeout before anything reaches a
//! driver.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::SqlFluentError;
use crate::placeholders::count_placeholders;
use crate::pool::DriverConnection;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Uniform capability surface over a concrete database client.
#[async_trait]
pub trait DriverAdapter {
    /// Prepare, bind positionally, execute, and fetch all rows.
    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlFluentError>;

    /// Prepare, bind positionally, execute; returns rows affected.
    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, SqlFluentError>;

    /// Execute statement text verbatim, bypassing prepare and bind.
    async fn execute_raw(&mut self, query: &str) -> Result<ResultSet, SqlFluentError>;

    /// Identifier assigned by the most recent INSERT on this connection.
    async fn last_insert_id(&mut self) -> Result<i64, SqlFluentError>;
}

#[async_trait]
impl DriverAdapter for DriverConnection {
    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlFluentError> {
        match self {
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(conn) => {
                crate::postgres::execute_select(conn, query, params).await
            }
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => {
                crate::sqlite::execute_select(conn, query, params).await
            }
        }
    }

    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, SqlFluentError> {
        match self {
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(conn) => {
                crate::postgres::execute_dml(conn, query, params).await
            }
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => {
                crate::sqlite::execute_dml(conn, query, params).await
            }
        }
    }

    async fn execute_raw(&mut self, query: &str) -> Result<ResultSet, SqlFluentError> {
        match self {
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(conn) => crate::postgres::execute_raw(conn, query).await,
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => crate::sqlite::execute_raw(conn, query).await,
        }
    }

    async fn last_insert_id(&mut self) -> Result<i64, SqlFluentError> {
        match self {
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(conn) => crate::postgres::last_insert_id(conn).await,
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => crate::sqlite::last_insert_id(conn).await,
        }
    }
}

/// Placeholder marker count must line up with the flattened parameter list
/// before anything is sent to a driver; marker *i* binds parameter *i*.
fn check_alignment(sql: &str, params: &[RowValues]) -> Result<(), SqlFluentError> {
    let markers = count_placeholders(sql);
    if markers != params.len() {
        return Err(SqlFluentError::BindError(format!(
            "statement has {markers} placeholder(s) but {} parameter(s) are bound",
            params.len()
        )));
    }
    Ok(())
}

async fn with_timeout<T>(
    fut: impl Future<Output = Result<T, SqlFluentError>> + Send,
    timeout: Option<Duration>,
) -> Result<T, SqlFluentError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
            SqlFluentError::ExecutionError(format!("statement timed out after {limit:?}"))
        })?,
        None => fut.await,
    }
}

pub(crate) async fn dispatch_select(
    conn: &mut DriverConnection,
    sql: &str,
    params: &[RowValues],
    timeout: Option<Duration>,
) -> Result<ResultSet, SqlFluentError> {
    check_alignment(sql, params)?;
    debug!(statement = sql, params = params.len(), "dispatching query");
    with_timeout(conn.execute_select(sql, params), timeout).await
}

pub(crate) async fn dispatch_dml(
    conn: &mut DriverConnection,
    sql: &str,
    params: &[RowValues],
    timeout: Option<Duration>,
) -> Result<usize, SqlFluentError> {
    check_alignment(sql, params)?;
    debug!(statement = sql, params = params.len(), "dispatching DML");
    with_timeout(conn.execute_dml(sql, params), timeout).await
}

pub(crate) async fn dispatch_raw(
    conn: &mut DriverConnection,
    sql: &str,
    timeout: Option<Duration>,
) -> Result<ResultSet, SqlFluentError> {
    warn!(statement = sql, "executing raw statement without parameter binding");
    with_timeout(conn.execute_raw(sql), timeout).await
}

pub(crate) async fn dispatch_last_insert_id(
    conn: &mut DriverConnection,
    timeout: Option<Duration>,
) -> Result<i64, SqlFluentError> {
    with_timeout(conn.last_insert_id(), timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_accepts_matching_counts() {
        assert!(check_alignment("a = ? AND b = ?", &[RowValues::Int(1), RowValues::Int(2)]).is_ok());
        assert!(check_alignment("SELECT 1", &[]).is_ok());
    }

    #[test]
    fn alignment_rejects_mismatch() {
        let err = check_alignment("a = ?", &[]).unwrap_err();
        assert!(matches!(err, SqlFluentError::BindError(_)));
    }
}
