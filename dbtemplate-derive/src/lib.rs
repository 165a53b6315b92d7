//! Derive macros for the dbtemplate data access layer
//!
//! This crate provides the `Entity` derive macro, which maps result columns
//! to struct fields by name.
//!
//! The macro is re-exported from the `dbtemplate` crate, so users typically
//! don't need to depend on this crate directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod entity;

/// Derive macro for populating structs from result rows by column name.
///
/// This macro generates an implementation of the `Entity` trait. The struct
/// must also implement `Default`, which supplies the value of every field
/// that no column fills.
///
/// # Attributes
///
/// - `#[dbtemplate(rename = "column_name")]` - Match a different column name for this field
/// - `#[dbtemplate(skip)]` - Never fill this field from a row
///
/// # Example
///
/// ```ignore
/// use dbtemplate::Entity;
///
/// #[derive(Default, Entity)]
/// pub struct User {
///     pub id: String,
///     #[dbtemplate(rename = "user_name")]
///     pub name: String,
///     #[dbtemplate(skip)]
///     pub age: i32,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(dbtemplate))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
