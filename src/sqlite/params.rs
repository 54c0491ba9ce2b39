use crate::error::SqlFluentError;
use crate::types::{ConversionMode, ParamConverter, RowValues};

/// Convert a single `RowValues` into the matching `rusqlite` storage class.
///
/// This is where each bound value picks up its type tag: text maps to `Text`,
/// floats to `Real`, integers (and bools) to `Integer`, and everything else
/// is serialized into `Text`/`Blob` form. The whole homogeneous vector is
/// then handed to the statement in one call.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> rusqlite::types::Value {
    match value {
        RowValues::Int(i) => rusqlite::types::Value::Integer(*i),
        RowValues::Float(f) => rusqlite::types::Value::Real(*f),
        RowValues::Text(s) => rusqlite::types::Value::Text(s.clone()),
        RowValues::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => {
            rusqlite::types::Value::Text(dt.format("%F %T%.f").to_string())
        }
        RowValues::Null => rusqlite::types::Value::Null,
        RowValues::JSON(jval) => rusqlite::types::Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
    }
}

/// Unified `SQLite` parameter container.
pub struct Params(pub Vec<rusqlite::types::Value>);

impl Params {
    /// Convert a flattened parameter list into `SQLite` values.
    ///
    /// # Errors
    ///
    /// Kept fallible for parity with the typed backend; the storage-class
    /// mapping itself is total.
    pub fn convert(params: &[RowValues]) -> Result<Self, SqlFluentError> {
        Ok(Params(
            params.iter().map(row_value_to_sqlite_value).collect(),
        ))
    }

    /// Borrow the underlying values.
    #[must_use]
    pub fn as_values(&self) -> &[rusqlite::types::Value] {
        &self.0
    }
}

impl ParamConverter<'_> for Params {
    type Converted = Params;

    fn convert_sql_params(
        params: &[RowValues],
        _mode: ConversionMode,
    ) -> Result<Self::Converted, SqlFluentError> {
        Self::convert(params)
    }

    fn supports_mode(mode: ConversionMode) -> bool {
        matches!(mode, ConversionMode::Query | ConversionMode::Execute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_class_per_value() {
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Int(7)),
            rusqlite::types::Value::Integer(7)
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Bool(true)),
            rusqlite::types::Value::Integer(1)
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Float(1.5)),
            rusqlite::types::Value::Real(1.5)
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Text("x".into())),
            rusqlite::types::Value::Text("x".to_string())
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Null),
            rusqlite::types::Value::Null
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Blob(vec![1, 2])),
            rusqlite::types::Value::Blob(vec![1, 2])
        );
    }
}
