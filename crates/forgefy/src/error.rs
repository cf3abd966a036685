use serde_json::Value;
use thiserror::Error;

/// Errors raised inside operator bodies.
///
/// Path misses and unknown operator keys are not errors — both resolve to
/// `null`. Every variant here originates in an operator and can be
/// intercepted by a `fallback` field on that operator's input; without one
/// it propagates unchanged to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperatorError {
    /// Structurally invalid operator input: wrong type or missing field.
    #[error("\"{operator}\" operator expects {expected}, got: {input}")]
    InvalidInput {
        operator: &'static str,
        expected: String,
        input: String,
    },

    #[error("DIVISION_BY_ZERO")]
    DivisionByZero,

    #[error("NEGATIVE_SQRT")]
    NegativeSqrt,

    #[error("NOT_A_NUMBER: {0}")]
    NotANumber(String),

    #[error("NOT_FINITE")]
    NotFinite,

    #[error("INVALID_DATE: {0}")]
    InvalidDate(String),

    #[error("INVALID_REGEX: {0}")]
    InvalidRegex(String),
}

impl OperatorError {
    /// Builds an `InvalidInput` error, rendering the offending input as
    /// compact JSON.
    pub fn invalid_input(
        operator: &'static str,
        expected: impl Into<String>,
        input: &Value,
    ) -> Self {
        OperatorError::InvalidInput {
            operator,
            expected: expected.into(),
            input: input.to_string(),
        }
    }
}
