//! Comparison operators.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::fallback;
use crate::operator::OperatorDefinition;
use crate::util;
use serde_json::{Number, Value};
use std::cmp::Ordering;

fn eq_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (a, b) = util::pair("$eq", input)?;
        Ok(Value::Bool(util::deep_equal(a, b)))
    })
}

fn ne_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (a, b) = util::pair("$ne", input)?;
        Ok(Value::Bool(!util::deep_equal(a, b)))
    })
}

fn relational(
    operator: &'static str,
    input: &Value,
    accepts: fn(Ordering) -> bool,
) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (a, b) = util::pair(operator, input)?;
        Ok(Value::Bool(accepts(util::compare(a, b))))
    })
}

fn gt_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    relational("$gt", input, Ordering::is_gt)
}

fn gte_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    relational("$gte", input, Ordering::is_ge)
}

fn lt_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    relational("$lt", input, Ordering::is_lt)
}

fn lte_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    relational("$lte", input, Ordering::is_le)
}

fn cmp_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (a, b) = util::pair("$cmp", input)?;
        let sign = match util::compare(a, b) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        };
        Ok(Value::Number(Number::from(sign)))
    })
}

// [needle, haystack]: membership in an array, substring in a string.
fn in_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (needle, haystack) = util::pair("$in", input)?;
        match haystack {
            Value::Array(items) => Ok(Value::Bool(
                items.iter().any(|item| util::deep_equal(item, needle)),
            )),
            Value::String(s) => Ok(Value::Bool(s.contains(&util::str_val(needle)))),
            other => Err(OperatorError::invalid_input(
                "$in",
                "an array or string haystack",
                other,
            )),
        }
    })
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { key: "$eq", apply: eq_eval, defer_input: false },
        OperatorDefinition { key: "$ne", apply: ne_eval, defer_input: false },
        OperatorDefinition { key: "$gt", apply: gt_eval, defer_input: false },
        OperatorDefinition { key: "$gte", apply: gte_eval, defer_input: false },
        OperatorDefinition { key: "$lt", apply: lt_eval, defer_input: false },
        OperatorDefinition { key: "$lte", apply: lte_eval, defer_input: false },
        OperatorDefinition { key: "$cmp", apply: cmp_eval, defer_input: false },
        OperatorDefinition { key: "$in", apply: in_eval, defer_input: false },
    ]
}
