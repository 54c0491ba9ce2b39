use deadpool_sqlite::{Config as DeadpoolSqliteConfig, Pool, Runtime};

use crate::error::SqlFluentError;

/// Build a `SQLite` pool for the given database path and verify the first
/// connection with a journal-mode pragma.
///
/// # Errors
///
/// Returns `SqlFluentError::ConnectionError` if pool creation fails, or the
/// smoke statement's error if the database cannot be opened.
pub async fn build_pool(db_path: &str) -> Result<Pool, SqlFluentError> {
    let cfg = DeadpoolSqliteConfig::new(db_path.to_string());

    let pool = cfg.create_pool(Runtime::Tokio1).map_err(|e| {
        SqlFluentError::ConnectionError(format!("Failed to create SQLite pool: {e}"))
    })?;

    {
        let conn = pool
            .get()
            .await
            .map_err(SqlFluentError::PoolErrorSqlite)?;
        conn.interact(|conn| {
            conn.execute_batch("PRAGMA journal_mode = WAL;")
                .map_err(SqlFluentError::SqliteError)
        })
        .await??;
    }

    Ok(pool)
}
