// Result materialization - ordered rows drained from a driver cursor.
//
// - row: a single record resolving column names against a shared header
// - result_set: the ordered collection produced by one terminal execution

pub mod result_set;
pub mod row;

pub use result_set::ResultSet;
pub use row::Row;
