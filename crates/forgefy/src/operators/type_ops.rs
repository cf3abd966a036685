//! Type predicates and conversions.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::fallback;
use crate::operator::OperatorDefinition;
use crate::resolver;
use crate::util;
use serde_json::Value;

fn to_number_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(util::number(util::num(value)?)))
}

fn to_bool_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(Value::Bool(util::is_truthy(value))))
}

fn type_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        Ok(Value::String(util::type_name(value).to_string()))
    })
}

fn predicate(input: &Value, test: fn(&Value) -> bool) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(Value::Bool(test(value))))
}

fn is_number_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    predicate(input, Value::is_number)
}

fn is_string_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    predicate(input, Value::is_string)
}

fn is_boolean_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    predicate(input, Value::is_boolean)
}

fn is_array_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    predicate(input, Value::is_array)
}

fn is_object_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    predicate(input, Value::is_object)
}

fn is_null_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    predicate(input, Value::is_null)
}

/// Presence check. Deferred input: a path string probes the source (or a
/// bound loop variable) for an actual hit, so a key holding `null` still
/// exists; any other input resolves and tests non-null.
fn exists_eval(input: &Value, ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    match input {
        Value::String(path) if forgefy_path::is_path_ref(path) => {
            Ok(Value::Bool(resolver::probe_path(path, ctx).is_some()))
        }
        other => {
            let resolved = resolver::resolve_in(other, ctx)?;
            Ok(Value::Bool(!resolved.is_null()))
        }
    }
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { key: "$toNumber", apply: to_number_eval, defer_input: false },
        OperatorDefinition { key: "$toBool", apply: to_bool_eval, defer_input: false },
        OperatorDefinition { key: "$type", apply: type_eval, defer_input: false },
        OperatorDefinition { key: "$isNumber", apply: is_number_eval, defer_input: false },
        OperatorDefinition { key: "$isString", apply: is_string_eval, defer_input: false },
        OperatorDefinition { key: "$isBoolean", apply: is_boolean_eval, defer_input: false },
        OperatorDefinition { key: "$isArray", apply: is_array_eval, defer_input: false },
        OperatorDefinition { key: "$isObject", apply: is_object_eval, defer_input: false },
        OperatorDefinition { key: "$isNull", apply: is_null_eval, defer_input: false },
        OperatorDefinition { key: "$exists", apply: exists_eval, defer_input: true },
    ]
}
