//! SQLite connection source implementation

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::OpenFlags;
use tracing::trace;

use crate::error::Result;
use crate::traits::{Connection, ConnectionSource};

use super::statement::SqliteStatement;

/// A source of SQLite connections.
///
/// Every [`acquire`](ConnectionSource::acquire) opens a fresh connection and
/// dropping it closes it; nothing is pooled. The source itself is `Send +
/// Sync`, so one instance can back a template shared across threads.
///
/// # Example
///
/// ```ignore
/// use dbtemplate::{SqliteSource, Template};
///
/// let source = SqliteSource::open("app.db")?;
/// let template = Template::new(source);
/// ```
pub struct SqliteSource {
    location: PathBuf,
    flags: OpenFlags,
    busy_timeout: Duration,
    foreign_keys: bool,
    // Keeps a named in-memory database alive between calls. Never locked.
    _anchor: Option<Mutex<rusqlite::Connection>>,
}

impl SqliteSource {
    /// Source for the database file at `path`, created if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        SqliteSourceBuilder::file(path).build()
    }

    /// Source for a named in-memory database.
    ///
    /// All connections acquired from this source see the same data, which
    /// lives as long as the source does. The database uses ordinary SQLite
    /// locking, so concurrent writers wait out the busy timeout instead of
    /// failing.
    pub fn memory(name: &str) -> Result<Self> {
        SqliteSourceBuilder::memory(name).build()
    }

    /// Create a builder for a database file.
    ///
    /// See [`SqliteSourceBuilder`] for available options.
    pub fn builder(path: impl AsRef<Path>) -> SqliteSourceBuilder {
        SqliteSourceBuilder::file(path)
    }

    /// Run one or more `;`-separated statements on a fresh connection.
    ///
    /// Meant for schema setup; statements take no parameters.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self.acquire()?;
        conn.inner.execute_batch(sql)?;
        Ok(())
    }

    fn open_connection(&self) -> Result<rusqlite::Connection> {
        let conn = rusqlite::Connection::open_with_flags(&self.location, self.flags)?;
        conn.busy_timeout(self.busy_timeout)?;
        if self.foreign_keys {
            conn.pragma_update(None, "foreign_keys", true)?;
        }
        Ok(conn)
    }
}

impl ConnectionSource for SqliteSource {
    type Connection = SqliteConnection;

    fn acquire(&self) -> Result<SqliteConnection> {
        let inner = self.open_connection()?;
        trace!(location = %self.location.display(), "acquired sqlite connection");
        Ok(SqliteConnection { inner })
    }
}

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// The memdb VFS shares a database between connections whose path starts
// with `/`. Unlike `cache=shared` it takes file-style locks, which the busy
// handler retries.
fn memory_uri(name: &str) -> String {
    format!("file:/{}?vfs=memdb", urlencoding::encode(name))
}

enum Target {
    File(PathBuf),
    Memory(String),
}

/// Builder for configuring a [`SqliteSource`].
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use dbtemplate::SqliteSourceBuilder;
///
/// let source = SqliteSourceBuilder::file("app.db")
///     .busy_timeout(Duration::from_secs(2))
///     .foreign_keys(true)
///     .build()?;
/// ```
pub struct SqliteSourceBuilder {
    target: Target,
    busy_timeout: Option<Duration>,
    foreign_keys: bool,
    read_only: bool,
}

impl SqliteSourceBuilder {
    /// Create a new builder for the database file at `path`.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::with_target(Target::File(path.as_ref().to_path_buf()))
    }

    /// Create a new builder for a named in-memory database.
    pub fn memory(name: &str) -> Self {
        Self::with_target(Target::Memory(name.to_string()))
    }

    fn with_target(target: Target) -> Self {
        Self {
            target,
            busy_timeout: None,
            foreign_keys: false,
            read_only: false,
        }
    }

    /// How long a connection waits on a locked database before failing.
    ///
    /// Defaults to five seconds.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }

    /// Enforce foreign key constraints on every connection.
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Open connections read-only. The file must already exist.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Build the [`SqliteSource`] with the configured options.
    pub fn build(self) -> Result<SqliteSource> {
        let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        flags |= if self.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        };

        let (location, anchor) = match self.target {
            Target::File(path) => (path, None),
            Target::Memory(name) => {
                let uri = memory_uri(&name);
                let anchor = rusqlite::Connection::open_with_flags(
                    &uri,
                    OpenFlags::SQLITE_OPEN_URI
                        | OpenFlags::SQLITE_OPEN_READ_WRITE
                        | OpenFlags::SQLITE_OPEN_CREATE
                        | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )?;
                (PathBuf::from(uri), Some(Mutex::new(anchor)))
            }
        };

        Ok(SqliteSource {
            location,
            flags,
            busy_timeout: self.busy_timeout.unwrap_or(DEFAULT_BUSY_TIMEOUT),
            foreign_keys: self.foreign_keys,
            _anchor: anchor,
        })
    }
}

/// A SQLite connection acquired from a [`SqliteSource`].
///
/// The connection is closed when dropped.
pub struct SqliteConnection {
    inner: rusqlite::Connection,
}

impl Connection for SqliteConnection {
    type Statement<'c> = SqliteStatement<'c> where Self: 'c;

    fn prepare(&self, sql: &str) -> Result<Self::Statement<'_>> {
        let statement = self.inner.prepare(sql)?;
        Ok(SqliteStatement::new(statement))
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        trace!("released sqlite connection");
    }
}
