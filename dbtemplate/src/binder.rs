//! Positional parameter binding

use crate::error::{Error, Result};
use crate::traits::Statement;
use crate::value::Value;

/// Bind `params` onto the statement's placeholders in order.
///
/// `params[i]` goes to placeholder `i + 1`. The parameter count must equal
/// the placeholder count; a mismatch fails before anything is bound.
pub fn bind_params<S: Statement + ?Sized>(statement: &mut S, params: &[Value]) -> Result<()> {
    let expected = statement.parameter_count();
    if expected != params.len() {
        return Err(Error::ParameterCount {
            expected,
            actual: params.len(),
        });
    }

    for (i, value) in params.iter().enumerate() {
        statement.bind(i + 1, value)?;
    }
    Ok(())
}
