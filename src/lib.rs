//! Fluent SQL statement builder and positional parameter binding over
//! interchangeable database drivers.
//!
//! Chained clause calls accumulate statement text and bind values in
//! lockstep; a terminal call ([`QueryBuilder::get`], `insert`, `update`,
//! `delete`, `query`) flattens the values and dispatches through the driver
//! bound to the session: `tokio-postgres` or `rusqlite`, selected at
//! connector construction and uniform behind one surface.
//!
//! ```no_run
//! use sql_fluent::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlFluentError> {
//! let connector = Connector::sqlite("app.db").await?;
//! let mut db = connector.builder().await?;
//!
//! let rows = db
//!     .select(&["id", "name"])
//!     .from("users")
//!     .where_clause(Condition::flat("age", ">", 18))
//!     .and_where(Condition::flat("status", "=", "active"))
//!     .get()
//!     .await?;
//!
//! for row in &rows.results {
//!     println!("{:?}", row.get("name"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod placeholders;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use builder::{
    Condition, LikePosition, ParameterBinder, ParameterGroup, Prefix, QueryBuilder,
    StatementBuilder, StatementKind,
};
pub use config::{Connector, DbConfig};
pub use error::SqlFluentError;
pub use executor::DriverAdapter;
pub use pool::{DriverConnection, DriverPool};
pub use results::{ResultSet, Row};
pub use types::{DatabaseType, RowValues};
