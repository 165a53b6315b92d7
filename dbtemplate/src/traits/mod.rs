//! Core traits for dbtemplate

mod driver;
mod entity;
mod from_row;
mod from_value;
mod to_value;

pub use driver::{Connection, ConnectionSource, Cursor, Statement};
pub use entity::Entity;
pub use from_row::{Row, RowExt};
pub use from_value::FromValue;
pub use to_value::ToValue;
