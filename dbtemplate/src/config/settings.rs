//! Configuration settings for the execution template

use serde::Deserialize;
use std::path::Path;

use super::defaults;
use crate::error::{Error, Result};

/// What `execute_one` does when a query yields more than one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleRowPolicy {
    /// Return the first row in cursor order; further rows are ignored.
    #[default]
    First,
    /// Fail with [`Error::TooManyRows`].
    Exactly,
}

/// How result column names are compared with entity field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnMatch {
    /// Case-sensitive comparison.
    #[default]
    Exact,
    /// ASCII case-insensitive comparison.
    IgnoreCase,
}

impl ColumnMatch {
    /// Whether `column` names `field` under this policy.
    pub fn matches(self, column: &str, field: &str) -> bool {
        match self {
            ColumnMatch::Exact => column == field,
            ColumnMatch::IgnoreCase => column.eq_ignore_ascii_case(field),
        }
    }
}

/// Configuration for a [`Template`](crate::Template)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateConfig {
    /// Behaviour of `execute_one` on multi-row results
    #[serde(default = "default_single_row")]
    pub single_row: SingleRowPolicy,

    /// Column-to-field matching used by entity population
    #[serde(default = "default_column_match")]
    pub column_match: ColumnMatch,
}

// Default value functions for serde
fn default_single_row() -> SingleRowPolicy {
    defaults::SINGLE_ROW
}
fn default_column_match() -> ColumnMatch {
    defaults::COLUMN_MATCH
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            single_row: default_single_row(),
            column_match: default_column_match(),
        }
    }
}

impl TemplateConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse template config: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }
}
