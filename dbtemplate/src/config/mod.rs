//! Template configuration

pub mod defaults;
mod settings;

pub use settings::{ColumnMatch, SingleRowPolicy, TemplateConfig};
