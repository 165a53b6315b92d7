//! SQLite row implementation

use crate::error::Result;
use crate::traits::Row;
use crate::value::Value;

use super::types::from_sqlite_value;

// Column metadata comes from the statement the row belongs to
fn statement<'a, 'stmt>(row: &'a rusqlite::Row<'stmt>) -> &'a rusqlite::Statement<'stmt> {
    row.as_ref()
}

impl Row for rusqlite::Row<'_> {
    fn column_count(&self) -> usize {
        statement(self).column_count()
    }

    fn column_name(&self, index: usize) -> Option<&str> {
        statement(self).column_name(index).ok()
    }

    fn value_at(&self, index: usize) -> Result<Value> {
        let value = self.get_ref(index)?;
        Ok(from_sqlite_value(value))
    }
}
