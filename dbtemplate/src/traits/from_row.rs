//! Row access traits

use crate::error::{Error, Result};
use crate::traits::FromValue;
use crate::value::Value;

/// The row a cursor is currently positioned on.
///
/// This trait abstracts over driver row implementations so that row mappers
/// and entities work the same way against any backend. A row is only valid
/// while the cursor stays on it; mappers must not keep it.
pub trait Row {
    /// Number of columns in the result set.
    fn column_count(&self) -> usize;

    /// Name of the column at `index` (0-based).
    fn column_name(&self, index: usize) -> Option<&str>;

    /// Get the value of the column at `index` (0-based).
    fn value_at(&self, index: usize) -> Result<Value>;

    /// Get a value from the row by column name as a dynamic Value.
    ///
    /// Names are compared exactly. Returns an error if the column doesn't
    /// exist.
    fn get_value(&self, column: &str) -> Result<Value> {
        let index = (0..self.column_count())
            .find(|&i| self.column_name(i) == Some(column))
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        self.value_at(index)
    }
}

/// Extension trait for typed access to row values.
pub trait RowExt: Row {
    /// Get a typed value from the row by column name.
    fn get<T: FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get_value(column)?;
        T::from_value(value).map_err(|e| match e {
            Error::UnexpectedNull(_) => Error::UnexpectedNull(column.to_string()),
            other => other,
        })
    }

    /// Get a typed value from the row by column position (0-based).
    fn get_at<T: FromValue>(&self, index: usize) -> Result<T> {
        T::from_value(self.value_at(index)?)
    }

    /// Like [`get`](Self::get), but a missing column yields `None`.
    fn try_get<T: FromValue>(&self, column: &str) -> Result<Option<T>> {
        match self.get_value(column) {
            Ok(value) => T::from_value(value).map(Some),
            Err(Error::ColumnNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// Implement RowExt for all Row types, trait objects included
impl<R: Row + ?Sized> RowExt for R {}
