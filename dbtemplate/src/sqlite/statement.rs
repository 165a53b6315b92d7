//! SQLite statement and cursor implementation

use crate::error::Result;
use crate::traits::{Cursor, Row, Statement};
use crate::value::Value;

/// A prepared SQLite statement borrowed from a [`SqliteConnection`](super::SqliteConnection).
pub struct SqliteStatement<'c> {
    inner: rusqlite::Statement<'c>,
}

impl<'c> SqliteStatement<'c> {
    pub(crate) fn new(inner: rusqlite::Statement<'c>) -> Self {
        Self { inner }
    }
}

impl<'c> Statement for SqliteStatement<'c> {
    type Cursor<'s> = SqliteCursor<'s> where Self: 's;

    fn parameter_count(&self) -> usize {
        self.inner.parameter_count()
    }

    fn bind(&mut self, index: usize, value: &Value) -> Result<()> {
        self.inner.raw_bind_parameter(index, value)?;
        Ok(())
    }

    fn execute_update(&mut self) -> Result<u64> {
        let affected = self.inner.raw_execute()?;
        Ok(affected as u64)
    }

    fn execute_query(&mut self) -> Result<Self::Cursor<'_>> {
        let columns = self
            .inner
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        Ok(SqliteCursor {
            rows: self.inner.raw_query(),
            columns,
        })
    }
}

/// A cursor over the rows of a running SQLite query.
///
/// Dropping the cursor resets the statement it borrows.
pub struct SqliteCursor<'s> {
    rows: rusqlite::Rows<'s>,
    columns: Vec<String>,
}

impl Cursor for SqliteCursor<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> Result<Option<&dyn Row>> {
        let row = self.rows.next()?;
        Ok(row.map(|row| row as &dyn Row))
    }
}
