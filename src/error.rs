use thiserror::Error;

/// Unified error type for every failure the builder, binder, or drivers can
/// surface.
///
/// Driver-native errors pass through transparently; everything the engine
/// classifies itself carries the backend's literal message text. Nothing is
/// recovered internally; callers see the first failure immediately. A
/// zero-row result set is not an error.
#[derive(Debug, Error)]
pub enum SqlFluentError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolErrorPostgres(#[from] deadpool_postgres::PoolError),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    PoolErrorSqlite(#[from] deadpool_sqlite::PoolError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),

    #[error("Statement preparation error: {0}")]
    PrepareError(String),

    #[error("Parameter binding error: {0}")]
    BindError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

#[cfg(feature = "sqlite")]
impl From<deadpool_sqlite::InteractError> for SqlFluentError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        SqlFluentError::ConnectionError(format!("SQLite interact error: {err}"))
    }
}
