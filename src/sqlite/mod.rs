// SQLite backend - the prepare/execute driver with homogeneous value binding.
//
// - config: pool setup
// - params: RowValues -> rusqlite value conversion
// - query: statement execution and result materialization

pub mod config;
pub mod params;
pub mod query;

pub use params::Params;
pub use query::build_result_set;
pub use query::{execute_dml, execute_raw, execute_select, last_insert_id};
