//! Default configuration values - single source of truth

use super::{ColumnMatch, SingleRowPolicy};

/// `execute_one` returns the first row and ignores the rest
pub const SINGLE_ROW: SingleRowPolicy = SingleRowPolicy::First;

/// Column names must match field names exactly
pub const COLUMN_MATCH: ColumnMatch = ColumnMatch::Exact;
