use std::collections::HashMap;
use std::sync::Arc;

use super::row::{Row, build_column_index};
use crate::types::RowValues;

/// The materialized result of one terminal execution.
///
/// Rows are kept in fetch order; each new terminal call replaces the previous
/// result set wholesale, never appends to it.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<Row>,
    /// The number of rows affected (for DML statements)
    pub rows_affected: usize,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
            column_index: None,
        }
    }

    /// Set the column names for this result set (to be shared by all rows).
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Some(Arc::new(build_column_index(&column_names)));
        self.column_names = Some(column_names);
    }

    /// Get the column names for this result set.
    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Number of rows in the result set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when the query returned no rows. An empty set is a normal
    /// outcome, not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Add a row sharing this result set's column header.
    ///
    /// Values are ignored until `set_column_names` has established the
    /// header.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        let (Some(column_names), Some(column_index)) = (&self.column_names, &self.column_index)
        else {
            return;
        };

        self.results.push(Row {
            column_names: Arc::clone(column_names),
            values: row_values,
            column_index: Arc::clone(column_index),
        });
        self.rows_affected += 1;
    }

    /// Add a pre-built row, adopting its header if none is set yet.
    pub fn add_row(&mut self, row: Row) {
        if self.column_names.is_none() {
            self.column_names = Some(Arc::clone(&row.column_names));
            self.column_index = Some(Arc::clone(&row.column_index));
        }
        self.results.push(row);
        self.rows_affected += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_one_header() {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_column_names(Arc::new(vec!["id".to_string(), "name".to_string()]));
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("a".into())]);
        rs.add_row_values(vec![RowValues::Int(2), RowValues::Text("b".into())]);

        assert_eq!(rs.len(), 2);
        assert_eq!(*rs.results[0].get("id").unwrap().as_int().unwrap(), 1);
        assert_eq!(rs.results[1].get("name").unwrap().as_text().unwrap(), "b");
        assert!(Arc::ptr_eq(
            &rs.results[0].column_names,
            &rs.results[1].column_names
        ));
    }

    #[test]
    fn values_before_header_are_dropped() {
        let mut rs = ResultSet::default();
        rs.add_row_values(vec![RowValues::Int(1)]);
        assert!(rs.is_empty());
    }
}
