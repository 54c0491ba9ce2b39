use serde::Deserialize;

use crate::builder::QueryBuilder;
use crate::error::SqlFluentError;
use crate::pool::DriverPool;
use crate::types::DatabaseType;

fn default_charset() -> String {
    "utf8".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Connection configuration record.
///
/// One record describes one database; the `driver` field names the backend.
/// For SQLite, `database` is the file path (or `:memory:`) and the network
/// fields are ignored. `charset`, `timezone`, and `sql_mode` are recognized
/// so deployments can keep one config shape across environments; applying
/// session modes is the connection bootstrap's concern, not this crate's.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Backend name: `postgres` or `sqlite`
    pub driver: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Database name, or the database path for `SQLite`
    pub database: String,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub sql_mode: Option<String>,
}

impl DbConfig {
    /// Config for a `SQLite` database at `db_path`.
    #[must_use]
    pub fn sqlite(db_path: impl Into<String>) -> Self {
        Self {
            driver: "sqlite".to_string(),
            host: String::new(),
            port: 0,
            username: String::new(),
            password: String::new(),
            database: db_path.into(),
            charset: default_charset(),
            timezone: default_timezone(),
            sql_mode: None,
        }
    }

    /// Config for a Postgres database.
    #[must_use]
    pub fn postgres(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            driver: "postgres".to_string(),
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            database: database.into(),
            charset: default_charset(),
            timezone: default_timezone(),
            sql_mode: None,
        }
    }
}

/// Validated driver configuration plus its connection pool.
///
/// One `Connector` per database; it is cheap to clone and hand around. Each
/// logical query gets its own [`QueryBuilder`] from [`Connector::builder`],
/// so concurrent queries never share mutable statement state.
#[derive(Debug, Clone)]
pub struct Connector {
    pool: DriverPool,
    driver: DatabaseType,
}

impl Connector {
    /// Resolve the configured driver and build its pool.
    ///
    /// # Errors
    ///
    /// `UnsupportedDriver` if `config.driver` names a backend this build does
    /// not carry; otherwise config validation or pool creation errors.
    pub async fn new(config: &DbConfig) -> Result<Self, SqlFluentError> {
        match config.driver.as_str() {
            #[cfg(feature = "postgres")]
            "postgres" => {
                let pool = crate::postgres::config::build_pool(config)?;
                Ok(Self {
                    pool: DriverPool::Postgres(pool),
                    driver: DatabaseType::Postgres,
                })
            }
            #[cfg(feature = "sqlite")]
            "sqlite" => {
                let pool = crate::sqlite::config::build_pool(&config.database).await?;
                Ok(Self {
                    pool: DriverPool::Sqlite(pool),
                    driver: DatabaseType::Sqlite,
                })
            }
            other => Err(SqlFluentError::UnsupportedDriver(other.to_string())),
        }
    }

    /// Shorthand for a `SQLite` connector.
    ///
    /// # Errors
    ///
    /// See [`Connector::new`].
    #[cfg(feature = "sqlite")]
    pub async fn sqlite(db_path: &str) -> Result<Self, SqlFluentError> {
        Self::new(&DbConfig::sqlite(db_path)).await
    }

    /// The backend this connector is bound to.
    #[must_use]
    pub fn driver(&self) -> DatabaseType {
        self.driver
    }

    /// Check out a connection and wrap it in a fresh statement builder.
    ///
    /// # Errors
    ///
    /// Returns a pool error if no connection can be checked out.
    pub async fn builder(&self) -> Result<QueryBuilder, SqlFluentError> {
        let conn = self.pool.get_connection().await?;
        Ok(QueryBuilder::new(conn))
    }
}
