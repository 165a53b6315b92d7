//! Entity trait for column-name driven population

use crate::error::Result;
use crate::value::Value;

/// A type that can be filled from a row by matching column names to fields.
///
/// This trait is typically implemented via the `#[derive(Entity)]` macro,
/// which generates the field table from the struct definition. The
/// association between column names and fields is fixed per type; the
/// populator resolves it against a result set's columns once and reuses it
/// for every row.
///
/// # Manual Implementation
///
/// ```ignore
/// use dbtemplate::{Entity, FromValue, Result, Value};
///
/// #[derive(Default)]
/// pub struct User {
///     pub id: String,
///     pub age: i32,
/// }
///
/// impl Entity for User {
///     fn fields() -> &'static [&'static str] {
///         &["id", "age"]
///     }
///
///     fn set_field(&mut self, index: usize, value: Value) -> Result<()> {
///         match index {
///             0 => self.id = FromValue::from_value(value)?,
///             1 => self.age = FromValue::from_value(value)?,
///             _ => {}
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Entity: Default {
    /// Column names this type accepts, in field order.
    ///
    /// Fields without a mutator are left out and keep their default.
    fn fields() -> &'static [&'static str];

    /// Assign `value` to the field at `index` in [`fields`](Self::fields).
    ///
    /// Fails when the value cannot be coerced to the field's type.
    fn set_field(&mut self, index: usize, value: Value) -> Result<()>;
}
