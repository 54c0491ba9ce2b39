#[cfg(feature = "postgres")]
use deadpool_postgres::{Object as PostgresObject, Pool as DeadpoolPostgresPool};

#[cfg(feature = "sqlite")]
use deadpool_sqlite::{Object as SqliteObject, Pool as DeadpoolSqlitePool};

use crate::error::SqlFluentError;

/// Connection pool for database access.
///
/// Wraps the pool type of whichever backend the session is bound to.
#[derive(Clone)]
pub enum DriverPool {
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(DeadpoolPostgresPool),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(DeadpoolSqlitePool),
}

impl std::fmt::Debug for DriverPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => f.debug_tuple("Postgres").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.debug_tuple("Sqlite").finish(),
        }
    }
}

impl DriverPool {
    /// Check out one pooled connection.
    ///
    /// # Errors
    ///
    /// Returns the backend's pool error if checkout fails.
    pub async fn get_connection(&self) -> Result<DriverConnection, SqlFluentError> {
        match self {
            #[cfg(feature = "postgres")]
            DriverPool::Postgres(pool) => {
                let conn: PostgresObject = pool
                    .get()
                    .await
                    .map_err(SqlFluentError::PoolErrorPostgres)?;
                Ok(DriverConnection::Postgres(conn))
            }
            #[cfg(feature = "sqlite")]
            DriverPool::Sqlite(pool) => {
                let conn: SqliteObject = pool
                    .get()
                    .await
                    .map_err(SqlFluentError::PoolErrorSqlite)?;
                Ok(DriverConnection::Sqlite(conn))
            }
        }
    }
}

/// One checked-out driver connection.
///
/// Bound to a statement builder for the builder's entire lifetime; the
/// builder dispatches every prepare/execute through it.
#[derive(Debug)]
pub enum DriverConnection {
    /// `PostgreSQL` client connection
    #[cfg(feature = "postgres")]
    Postgres(PostgresObject),
    /// `SQLite` database connection
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteObject),
}
