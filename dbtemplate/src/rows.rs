//! Result iteration driver

use crate::config::ColumnMatch;
use crate::error::{Error, Result};
use crate::mapper::RowMapper;
use crate::traits::Cursor;

/// Advance `cursor` to exhaustion, mapping every row.
///
/// Returns every mapped value in cursor order, or the first failure. A
/// mapper failure is wrapped in [`Error::RowMapping`] with its 1-based row
/// number; cursor failures are returned as-is. The cursor is left open for
/// the caller to release.
pub fn collect_rows<T, C, M>(cursor: &mut C, mapper: &mut M, matching: ColumnMatch) -> Result<Vec<T>>
where
    C: Cursor + ?Sized,
    M: RowMapper<T> + ?Sized,
{
    mapper.prepare(cursor.columns(), matching);

    let mut results = Vec::new();
    while let Some(row) = cursor.advance()? {
        let entity = mapper.map_row(row).map_err(|e| Error::RowMapping {
            row: results.len() + 1,
            source: Box::new(e),
        })?;
        results.push(entity);
    }
    Ok(results)
}
