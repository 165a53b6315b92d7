//! SQLite implementation for dbtemplate

mod row;
mod source;
mod statement;
mod types;

pub use source::{SqliteConnection, SqliteSource, SqliteSourceBuilder};
pub use statement::{SqliteCursor, SqliteStatement};
