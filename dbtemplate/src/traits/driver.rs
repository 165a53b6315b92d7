//! Traits describing the raw connectivity primitive
//!
//! The template is written against these traits only. Resources are scoped
//! by ownership: a [`Statement`] borrows its [`Connection`], a [`Cursor`]
//! borrows its statement, and dropping a value releases it. That makes the
//! release order innermost-first on every exit path.

use crate::error::Result;
use crate::traits::Row;
use crate::value::Value;

/// Supplies one live connection per request.
///
/// Pooling, authentication and addressing live behind this trait.
pub trait ConnectionSource {
    /// The connection type handed out by this source.
    type Connection: Connection;

    /// Acquire a connection. Dropping it releases it.
    fn acquire(&self) -> Result<Self::Connection>;
}

/// A live database connection.
pub trait Connection {
    /// Prepared statement type, borrowing the connection.
    type Statement<'c>: Statement
    where
        Self: 'c;

    /// Prepare a statement from SQL text.
    fn prepare(&self, sql: &str) -> Result<Self::Statement<'_>>;
}

/// A prepared statement with positional placeholders.
pub trait Statement {
    /// Result cursor type, borrowing the statement.
    type Cursor<'s>: Cursor
    where
        Self: 's;

    /// Number of placeholders in the SQL text.
    fn parameter_count(&self) -> usize;

    /// Bind `value` to the placeholder at `index` (1-based).
    fn bind(&mut self, index: usize, value: &Value) -> Result<()>;

    /// Execute as a mutation and return the number of affected rows.
    fn execute_update(&mut self) -> Result<u64>;

    /// Execute as a query and open a cursor before the first row.
    fn execute_query(&mut self) -> Result<Self::Cursor<'_>>;
}

/// A forward-only cursor over a query's rows.
pub trait Cursor {
    /// Column names of the result set, in column order.
    fn columns(&self) -> &[String];

    /// Move to the next row, returning `None` once exhausted.
    fn advance(&mut self) -> Result<Option<&dyn Row>>;
}
