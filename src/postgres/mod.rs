// PostgreSQL backend - the typed driver binding parameters by position.
//
// - config: pool setup and config validation
// - params: RowValues -> ToSql positional references
// - query: statement execution and result materialization

pub mod config;
pub mod params;
pub mod query;

pub use params::Params;
pub use query::build_result_set_from_rows;
pub use query::{execute_dml, execute_raw, execute_select, last_insert_id};
