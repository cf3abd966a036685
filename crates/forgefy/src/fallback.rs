//! Error recovery for operators carrying a `fallback` field.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::resolver;
use crate::util;
use serde_json::Value;

/// Substitutes an already-resolved fallback value, or re-throws.
///
/// Inputs reach non-deferring operators fully resolved, so the fallback
/// needs no further resolution here — resolving a second time would mangle
/// `$`-strings that legitimately arrived from source data.
pub fn recover(fallback: Option<&Value>, error: OperatorError) -> Result<Value, OperatorError> {
    match fallback {
        Some(value) => Ok(value.clone()),
        None => Err(error),
    }
}

/// Fallback recovery for deferring operators, whose input is raw: the
/// fallback may still be a literal, path, or expression and is resolved
/// here exactly once.
pub fn recover_raw(
    fallback: Option<&Value>,
    ctx: &ExecutionContext<'_>,
    error: OperatorError,
) -> Result<Value, OperatorError> {
    match fallback {
        Some(expression) => resolver::resolve_in(expression, ctx),
        None => Err(error),
    }
}

/// Runs an operator body, routing any failure — input validation included —
/// through the `fallback` field of `input`.
pub fn with_fallback<F>(input: &Value, body: F) -> Result<Value, OperatorError>
where
    F: FnOnce() -> Result<Value, OperatorError>,
{
    body().or_else(|error| recover(util::fallback_of(input), error))
}

/// Same, for deferring operators: the `fallback` field is raw and gets
/// resolved on demand.
pub fn with_raw_fallback<F>(
    input: &Value,
    ctx: &ExecutionContext<'_>,
    body: F,
) -> Result<Value, OperatorError>
where
    F: FnOnce() -> Result<Value, OperatorError>,
{
    body().or_else(|error| recover_raw(util::fallback_of(input), ctx, error))
}

/// Unary-input runner: accepts both the bare and the `{value, fallback}`
/// form and routes failures through the fallback.
pub fn unary<F>(input: &Value, body: F) -> Result<Value, OperatorError>
where
    F: FnOnce(&Value) -> Result<Value, OperatorError>,
{
    let (value, fallback) = util::unary_input(input);
    body(value).or_else(|error| recover(fallback, error))
}
