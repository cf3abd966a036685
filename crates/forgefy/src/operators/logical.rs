//! Logical operators over truthiness.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::fallback;
use crate::operator::OperatorDefinition;
use crate::util;
use serde_json::Value;

fn all_truthy(operator: &'static str, input: &Value) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let items = util::as_array(operator, input)?;
        Ok(Value::Bool(items.iter().all(util::is_truthy)))
    })
}

fn any_truthy(operator: &'static str, input: &Value) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let items = util::as_array(operator, input)?;
        Ok(Value::Bool(items.iter().any(util::is_truthy)))
    })
}

fn and_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    all_truthy("$and", input)
}

fn or_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    any_truthy("$or", input)
}

fn not_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(Value::Bool(!util::is_truthy(value))))
}

fn every_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    all_truthy("$every", input)
}

fn some_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    any_truthy("$some", input)
}

fn none_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let items = util::as_array("$none", input)?;
        Ok(Value::Bool(!items.iter().any(util::is_truthy)))
    })
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { key: "$and", apply: and_eval, defer_input: false },
        OperatorDefinition { key: "$or", apply: or_eval, defer_input: false },
        OperatorDefinition { key: "$not", apply: not_eval, defer_input: false },
        OperatorDefinition { key: "$every", apply: every_eval, defer_input: false },
        OperatorDefinition { key: "$some", apply: some_eval, defer_input: false },
        OperatorDefinition { key: "$none", apply: none_eval, defer_input: false },
    ]
}
