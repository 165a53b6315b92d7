//! Error types for dbtemplate

use std::fmt;

use thiserror::Error;

/// Result type alias for dbtemplate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Underlying causes of a failed database operation.
///
/// Template methods never return this directly; they wrap it in an
/// [`ExecutionError`] that records which step of the call failed.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite driver error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection could not be acquired
    ///
    /// The SQLite driver reports its own failures as [`Error::Sqlite`];
    /// this variant is for other [`ConnectionSource`](crate::ConnectionSource)
    /// implementations.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Driver-level query failure that is not a SQLite error
    #[error("Query error: {0}")]
    Query(String),

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Column not found in row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Null value for non-optional target
    #[error("Unexpected null value for column: {0}")]
    UnexpectedNull(String),

    /// Parameter list does not match the statement's placeholders
    #[error("Statement expects {expected} parameters, got {actual}")]
    ParameterCount { expected: usize, actual: usize },

    /// More rows than the single-row policy allows
    #[error("Expected at most one row, found {0}")]
    TooManyRows(usize),

    /// A matched column could not be applied to its entity field
    #[error("Failed to populate field from column `{column}`: {source}")]
    Field {
        column: String,
        #[source]
        source: Box<Error>,
    },

    /// A row mapper failed; `row` is 1-based in cursor order
    #[error("Failed to map row {row}: {source}")]
    RowMapping {
        row: usize,
        #[source]
        source: Box<Error>,
    },

    /// Caller-defined mapping failure
    #[error("Mapping error: {0}")]
    Mapping(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an arbitrary error raised inside a caller's row mapper.
    pub fn mapping(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Mapping(err.into())
    }
}

/// The step of a template call at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Acquiring a connection from the source
    Acquire,
    /// Preparing the statement from SQL text
    Prepare,
    /// Binding parameters onto placeholders
    Bind,
    /// Executing the statement or advancing the cursor
    Execute,
    /// Turning a row into a value
    Map,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Acquire => "connection acquisition",
            Stage::Prepare => "statement preparation",
            Stage::Bind => "parameter binding",
            Stage::Execute => "statement execution",
            Stage::Map => "row mapping",
        };
        f.write_str(name)
    }
}

/// The single failure kind returned by [`Template`](crate::Template) calls.
///
/// Carries the original cause unchanged; inspect it with [`cause`](Self::cause)
/// when finer handling is needed.
#[derive(Error, Debug)]
#[error("{stage} failed for `{sql}`: {source}")]
pub struct ExecutionError {
    stage: Stage,
    sql: String,
    #[source]
    source: Error,
}

impl ExecutionError {
    pub(crate) fn new(stage: Stage, sql: &str, source: Error) -> Self {
        Self {
            stage,
            sql: sql.to_string(),
            source,
        }
    }

    /// The step that failed.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The SQL text of the failed call.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The underlying cause.
    pub fn cause(&self) -> &Error {
        &self.source
    }

    /// Consume the error and return the underlying cause.
    pub fn into_cause(self) -> Error {
        self.source
    }
}
