use deadpool_postgres::{Config as PgConfig, Pool};
use tokio_postgres::NoTls;

use crate::config::DbConfig;
use crate::error::SqlFluentError;

/// Build a Postgres pool from the shared configuration record.
///
/// # Errors
///
/// Returns `SqlFluentError::ConfigError` if a required field is missing or
/// `SqlFluentError::ConnectionError` if pool creation fails.
pub fn build_pool(config: &DbConfig) -> Result<Pool, SqlFluentError> {
    if config.database.is_empty() {
        return Err(SqlFluentError::ConfigError("database is required".to_string()));
    }
    if config.host.is_empty() {
        return Err(SqlFluentError::ConfigError("host is required".to_string()));
    }
    if config.port == 0 {
        return Err(SqlFluentError::ConfigError("port is required".to_string()));
    }
    if config.username.is_empty() {
        return Err(SqlFluentError::ConfigError("username is required".to_string()));
    }

    let mut pg_config = PgConfig::new();
    pg_config.dbname = Some(config.database.clone());
    pg_config.host = Some(config.host.clone());
    pg_config.port = Some(config.port);
    pg_config.user = Some(config.username.clone());
    pg_config.password = Some(config.password.clone());

    pg_config
        .create_pool(Some(deadpool_postgres::Runtime::Tokio1), NoTls)
        .map_err(|e| {
            SqlFluentError::ConnectionError(format!("Failed to create Postgres pool: {e}"))
        })
}
