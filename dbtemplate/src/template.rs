//! Execution template

use tracing::debug;

use crate::binder::bind_params;
use crate::config::{ColumnMatch, SingleRowPolicy, TemplateConfig};
use crate::error::{Error, ExecutionError, Stage};
use crate::mapper::RowMapper;
use crate::rows::collect_rows;
use crate::traits::{Connection, ConnectionSource, Statement};
use crate::value::Value;

fn failure(stage: Stage, sql: &str, source: Error) -> ExecutionError {
    debug!(%stage, sql, error = %source, "database call failed");
    ExecutionError::new(stage, sql, source)
}

/// Runs SQL against connections from a [`ConnectionSource`].
///
/// Every call acquires its own connection, prepares and binds one
/// statement, runs it, and releases the cursor, statement and connection
/// (in that order) before returning, whether the call succeeded or not.
/// Failures of any step come back as a single [`ExecutionError`]. A
/// template holds no per-call state, so it can be shared across threads
/// whenever its source can.
///
/// # Example
///
/// ```ignore
/// use dbtemplate::{map_with, params, populate, RowExt, SqliteSource, Template};
///
/// let template = Template::new(SqliteSource::open("app.db")?);
///
/// template.execute_update(
///     "INSERT INTO users (id, name, age) VALUES (?, ?, ?)",
///     &params!["jun", "hyunjun", 30],
/// )?;
///
/// let ages: Vec<i32> = template.execute(
///     "SELECT age FROM users ORDER BY id",
///     map_with(|row| row.get("age")),
///     &[],
/// )?;
///
/// let user: Option<User> = template.execute_one(
///     "SELECT * FROM users WHERE id = ?",
///     populate::<User>(),
///     &params!["jun"],
/// )?;
/// ```
#[derive(Clone)]
pub struct Template<S> {
    source: S,
    config: TemplateConfig,
}

impl<S: ConnectionSource> Template<S> {
    /// Create a template with the default configuration.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: TemplateConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: TemplateConfig) -> Self {
        self.config = config;
        self
    }

    /// Set what `execute_one` does with multi-row results.
    pub fn single_row(mut self, policy: SingleRowPolicy) -> Self {
        self.config.single_row = policy;
        self
    }

    /// Set how entity population matches columns to fields.
    pub fn column_match(mut self, matching: ColumnMatch) -> Self {
        self.config.column_match = matching;
        self
    }

    /// Get the active configuration.
    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Get a reference to the connection source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Execute a statement as a mutation.
    pub fn execute_update(&self, sql: &str, params: &[Value]) -> Result<(), ExecutionError> {
        debug!(sql, params = params.len(), "executing update");

        let conn = self
            .source
            .acquire()
            .map_err(|e| failure(Stage::Acquire, sql, e))?;
        let mut statement = conn
            .prepare(sql)
            .map_err(|e| failure(Stage::Prepare, sql, e))?;
        bind_params(&mut statement, params).map_err(|e| failure(Stage::Bind, sql, e))?;
        let affected = statement
            .execute_update()
            .map_err(|e| failure(Stage::Execute, sql, e))?;

        drop(statement);
        drop(conn);

        debug!(sql, affected, "update complete");
        Ok(())
    }

    /// Execute a query and map every row.
    ///
    /// Returns all rows in cursor order, or an error. A failure on any row
    /// fails the whole call; no partial list is returned.
    pub fn execute<T, M>(
        &self,
        sql: &str,
        mut mapper: M,
        params: &[Value],
    ) -> Result<Vec<T>, ExecutionError>
    where
        M: RowMapper<T>,
    {
        debug!(sql, params = params.len(), "executing query");

        let conn = self
            .source
            .acquire()
            .map_err(|e| failure(Stage::Acquire, sql, e))?;
        let mut statement = conn
            .prepare(sql)
            .map_err(|e| failure(Stage::Prepare, sql, e))?;
        bind_params(&mut statement, params).map_err(|e| failure(Stage::Bind, sql, e))?;
        let mut cursor = statement
            .execute_query()
            .map_err(|e| failure(Stage::Execute, sql, e))?;

        let rows = collect_rows(&mut cursor, &mut mapper, self.config.column_match).map_err(
            |e| {
                let stage = match e {
                    Error::RowMapping { .. } => Stage::Map,
                    _ => Stage::Execute,
                };
                failure(stage, sql, e)
            },
        )?;

        drop(cursor);
        drop(statement);
        drop(conn);

        debug!(sql, rows = rows.len(), "query complete");
        Ok(rows)
    }

    /// Execute a query expected to yield at most one row.
    ///
    /// Returns `None` for an empty result. With more than one row the
    /// configured [`SingleRowPolicy`] decides: `First` returns the first row
    /// in cursor order, `Exactly` fails with [`Error::TooManyRows`].
    pub fn execute_one<T, M>(
        &self,
        sql: &str,
        mapper: M,
        params: &[Value],
    ) -> Result<Option<T>, ExecutionError>
    where
        M: RowMapper<T>,
    {
        let rows = self.execute(sql, mapper, params)?;
        if rows.len() > 1 {
            match self.config.single_row {
                SingleRowPolicy::First => {
                    debug!(sql, rows = rows.len(), "keeping first of multiple rows")
                }
                SingleRowPolicy::Exactly => {
                    return Err(failure(
                        Stage::Execute,
                        sql,
                        Error::TooManyRows(rows.len()),
                    ));
                }
            }
        }
        Ok(rows.into_iter().next())
    }
}
