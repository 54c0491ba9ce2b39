//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types
//! to make it easier to get started with the library.

pub use crate::builder::{Condition, LikePosition, Prefix, QueryBuilder};
pub use crate::config::{Connector, DbConfig};
pub use crate::error::SqlFluentError;
pub use crate::executor::DriverAdapter;
pub use crate::pool::{DriverConnection, DriverPool};
pub use crate::results::{ResultSet, Row};
pub use crate::types::{DatabaseType, RowValues};
