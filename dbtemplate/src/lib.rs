//! dbtemplate - execution templates over a raw SQL driver
//!
//! A thin data-access layer that owns the connection, statement and cursor
//! lifecycle of each call, binds positional parameters, and maps result
//! rows to Rust values.
//!
//! # Features
//!
//! - **Execution Template**: `execute_update`, `execute` and `execute_one`
//!   with guaranteed release of every resource and one error type
//! - **Row Mappers**: explicit closures via [`map_with`], or column-name
//!   population via [`populate`] and `#[derive(Entity)]`
//! - **Type Safety**: a closed [`Value`] enum for parameters and columns,
//!   with best-effort coercion through [`FromValue`]
//! - **SQLite Driver**: [`SqliteSource`] for files and named in-memory
//!   databases
//!
//! # Example
//!
//! ```ignore
//! use dbtemplate::{params, populate, Entity, SqliteSource, Template};
//!
//! #[derive(Debug, Default, Entity)]
//! pub struct User {
//!     pub id: String,
//!     pub name: String,
//!     #[dbtemplate(skip)]
//!     pub age: i32,
//! }
//!
//! fn find_user(template: &Template<SqliteSource>, id: &str) -> Option<User> {
//!     template
//!         .execute_one("SELECT * FROM users WHERE id = ?", populate::<User>(), &params![id])
//!         .ok()
//!         .flatten()
//! }
//! ```

pub mod binder;
pub mod config;
pub mod error;
pub mod mapper;
pub mod rows;
pub mod sqlite;
pub mod template;
pub mod traits;
pub mod value;

// Re-export the derive macro
pub use dbtemplate_derive::Entity;

// Re-export main types
pub use config::{ColumnMatch, SingleRowPolicy, TemplateConfig};
pub use error::{Error, ExecutionError, Result, Stage};
pub use mapper::{map_with, populate, populate_row, ColumnPlan, MapWith, Populate, RowMapper};
pub use sqlite::{SqliteConnection, SqliteCursor, SqliteSource, SqliteSourceBuilder, SqliteStatement};
pub use template::Template;
pub use traits::{
    Connection, ConnectionSource, Cursor, Entity, FromValue, Row, RowExt, Statement, ToValue,
};
pub use value::Value;
