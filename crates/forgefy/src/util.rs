//! Coercion and input-shape helpers shared by the operator catalog.

use crate::error::OperatorError;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

// ----------------------------------------------------------------- Coercion

/// Converts a value to a number.
///
/// Numbers pass through, strings parse (trimmed), booleans are 0/1.
/// Everything else raises `NOT_A_NUMBER`, so mapping bugs surface through
/// the fallback path instead of silently becoming zero.
pub fn num(value: &Value) -> Result<f64, OperatorError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| OperatorError::NotANumber(n.to_string())),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(OperatorError::NotANumber(s.clone())),
        },
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(OperatorError::NotANumber(other.to_string())),
    }
}

/// Converts a float back into a JSON number.
///
/// Integral results land as JSON integers (`2.0` → `2`) so shaped output
/// round-trips; non-finite values collapse to null, the JSON spelling of
/// NaN/Infinity.
pub fn number(n: f64) -> Value {
    if !n.is_finite() {
        return Value::Null;
    }
    // 2^53 - 1: the last float whose integer value is exact.
    if n.fract() == 0.0 && n.abs() <= 9_007_199_254_740_991.0 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// String rendition of any value: null → `"null"`, scalars via display,
/// arrays and objects as compact JSON.
pub fn str_val(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

/// Truthiness: null, false, 0 and "" are falsy; everything else —
/// empty arrays and objects included — is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// JSON type name of a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// --------------------------------------------------------------- Comparison

/// Deep equality with numeric awareness: `1` and `1.0` compare equal,
/// unlike serde_json's `PartialEq`, which separates integer and float
/// storage.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(fx), Some(fy)) => fx == fy,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, x)| ym.get(k).map_or(false, |y| deep_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Relational comparison: numeric when both sides are numbers, otherwise
/// lexicographic over the string rendition.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let fx = x.as_f64().unwrap_or(0.0);
            let fy = y.as_f64().unwrap_or(0.0);
            fx.partial_cmp(&fy).unwrap_or(Ordering::Equal)
        }
        _ => str_val(a).cmp(&str_val(b)),
    }
}

// ------------------------------------------------------------- Input shapes

/// Requires the input to be a plain object.
pub fn as_object<'a>(
    operator: &'static str,
    input: &'a Value,
) -> Result<&'a Map<String, Value>, OperatorError> {
    input
        .as_object()
        .ok_or_else(|| OperatorError::invalid_input(operator, "an object input", input))
}

/// Requires the input to be an array.
pub fn as_array<'a>(
    operator: &'static str,
    input: &'a Value,
) -> Result<&'a Vec<Value>, OperatorError> {
    input
        .as_array()
        .ok_or_else(|| OperatorError::invalid_input(operator, "an array input", input))
}

/// Requires a named field on an object input.
pub fn require_field<'a>(
    operator: &'static str,
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Value, OperatorError> {
    obj.get(field).ok_or_else(|| OperatorError::InvalidInput {
        operator,
        expected: format!("a \"{}\" field", field),
        input: serde_json::to_string(obj).unwrap_or_default(),
    })
}

/// Exactly two operands from a list input.
pub fn pair<'a>(
    operator: &'static str,
    input: &'a Value,
) -> Result<(&'a Value, &'a Value), OperatorError> {
    let items = as_array(operator, input)?;
    if items.len() != 2 {
        return Err(OperatorError::invalid_input(
            operator,
            "exactly two operands",
            input,
        ));
    }
    Ok((&items[0], &items[1]))
}

/// Two numeric operands, accepted as a list `[a, b]` or an object with the
/// given field names (a `fallback` field may sit alongside).
pub fn binary_numeric(
    operator: &'static str,
    input: &Value,
    first: &'static str,
    second: &'static str,
) -> Result<(f64, f64), OperatorError> {
    match input {
        Value::Array(items) if items.len() == 2 => Ok((num(&items[0])?, num(&items[1])?)),
        Value::Object(map) => {
            let a = num(require_field(operator, map, first)?)?;
            let b = num(require_field(operator, map, second)?)?;
            Ok((a, b))
        }
        _ => Err(OperatorError::invalid_input(
            operator,
            format!("a [a, b] pair or {{{}, {}}} fields", first, second),
            input,
        )),
    }
}

/// Coerces every element of a list input to a number.
pub fn num_list(operator: &'static str, input: &Value) -> Result<Vec<f64>, OperatorError> {
    as_array(operator, input)?.iter().map(num).collect()
}

/// Splits a unary operator input into operand and optional fallback.
///
/// Both forms are accepted: bare (`{"$abs": "$n"}`) and object
/// (`{"$abs": {"value": "$n", "fallback": 0}}`). The object form is
/// recognized by the presence of a `value` key.
pub fn unary_input(input: &Value) -> (&Value, Option<&Value>) {
    if let Value::Object(map) = input {
        if let Some(value) = map.get("value") {
            return (value, map.get("fallback"));
        }
    }
    (input, None)
}

/// The `fallback` field of an object input, when present.
pub fn fallback_of(input: &Value) -> Option<&Value> {
    input.as_object().and_then(|map| map.get("fallback"))
}
