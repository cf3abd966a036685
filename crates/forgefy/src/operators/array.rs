//! Array operators, including the deferred-input transforms.
//!
//! `$map`, `$filter` and `$reduce` receive raw input: they resolve their
//! own `input` slot, then resolve the lambda expression once per element
//! under a scope binding `$current`/`$index` (and `$accumulated` for
//! `$reduce`).

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::fallback;
use crate::operator::OperatorDefinition;
use crate::resolver;
use crate::util;
use serde_json::{Map, Number, Value};

fn resolve_items(
    operator: &'static str,
    obj: &Map<String, Value>,
    ctx: &ExecutionContext<'_>,
) -> Result<Vec<Value>, OperatorError> {
    let raw = util::require_field(operator, obj, "input")?;
    match resolver::resolve_in(raw, ctx)? {
        Value::Array(items) => Ok(items),
        other => Err(OperatorError::invalid_input(operator, "an array input", &other)),
    }
}

fn map_eval(input: &Value, ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_raw_fallback(input, ctx, || {
        let obj = util::as_object("$map", input)?;
        let lambda = util::require_field("$map", obj, "apply")?;
        let items = resolve_items("$map", obj, ctx)?;
        let mut mapped = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let scope = ctx.with_element(item, index);
            mapped.push(resolver::resolve_in(lambda, &scope)?);
        }
        Ok(Value::Array(mapped))
    })
}

fn filter_eval(input: &Value, ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_raw_fallback(input, ctx, || {
        let obj = util::as_object("$filter", input)?;
        let condition = util::require_field("$filter", obj, "condition")?;
        let items = resolve_items("$filter", obj, ctx)?;
        let mut kept = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let scope = ctx.with_element(item, index);
            if util::is_truthy(&resolver::resolve_in(condition, &scope)?) {
                kept.push(item.clone());
            }
        }
        Ok(Value::Array(kept))
    })
}

fn reduce_eval(input: &Value, ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_raw_fallback(input, ctx, || {
        let obj = util::as_object("$reduce", input)?;
        let lambda = util::require_field("$reduce", obj, "apply")?;
        let initial = util::require_field("$reduce", obj, "initialValue")?;
        let items = resolve_items("$reduce", obj, ctx)?;
        let mut accumulated = resolver::resolve_in(initial, ctx)?;
        for (index, item) in items.iter().enumerate() {
            let scope = ctx.with_element(item, index).with_accumulated(&accumulated);
            let next = resolver::resolve_in(lambda, &scope)?;
            accumulated = next;
        }
        Ok(accumulated)
    })
}

fn size_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        let len = match value {
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            Value::String(s) => s.chars().count(),
            other => {
                return Err(OperatorError::invalid_input(
                    "$size",
                    "an array, object or string",
                    other,
                ))
            }
        };
        Ok(Value::Number(Number::from(len as u64)))
    })
}

fn array_first_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        let items = util::as_array("$arrayFirst", value)?;
        Ok(items.first().cloned().unwrap_or(Value::Null))
    })
}

fn array_last_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        let items = util::as_array("$arrayLast", value)?;
        Ok(items.last().cloned().unwrap_or(Value::Null))
    })
}

fn array_elem_at_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$arrayElemAt", input)?;
        let items = util::as_array(
            "$arrayElemAt",
            util::require_field("$arrayElemAt", obj, "input")?,
        )?;
        let index = util::num(util::require_field("$arrayElemAt", obj, "index")?)?.trunc() as i64;
        let position = if index < 0 {
            index + items.len() as i64
        } else {
            index
        };
        if position < 0 || position as usize >= items.len() {
            return Ok(Value::Null);
        }
        Ok(items[position as usize].clone())
    })
}

// JS Array.prototype.slice index handling: truncate, negative counts from
// the end, then clamp to the array bounds.
fn slice_bound(raw: f64, len: usize) -> usize {
    let n = len as f64;
    let v = raw.trunc();
    let absolute = if v < 0.0 { n + v } else { v };
    absolute.max(0.0).min(n) as usize
}

fn slice_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$slice", input)?;
        let items = util::as_array("$slice", util::require_field("$slice", obj, "input")?)?;
        let start = slice_bound(
            util::num(util::require_field("$slice", obj, "start")?)?,
            items.len(),
        );
        let end = match obj.get("end") {
            Some(e) => slice_bound(util::num(e)?, items.len()),
            None => items.len(),
        };
        Ok(Value::Array(items[start..end.max(start)].to_vec()))
    })
}

fn reverse_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        let items = util::as_array("$reverse", value)?;
        Ok(Value::Array(items.iter().rev().cloned().collect()))
    })
}

fn sort_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        let mut items = util::as_array("$sort", value)?.clone();
        if items.iter().all(Value::is_number) {
            items.sort_by(util::compare);
        } else {
            // String-keyed sort stays a total order on mixed arrays.
            items.sort_by_key(util::str_val);
        }
        Ok(Value::Array(items))
    })
}

fn unique_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        let items = util::as_array("$unique", value)?;
        let mut kept: Vec<Value> = Vec::new();
        for item in items {
            if !kept.iter().any(|seen| util::deep_equal(seen, item)) {
                kept.push(item.clone());
            }
        }
        Ok(Value::Array(kept))
    })
}

fn flatten_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        let items = util::as_array("$flatten", value)?;
        let mut flat = Vec::new();
        for item in items {
            match item {
                Value::Array(inner) => flat.extend(inner.iter().cloned()),
                other => flat.push(other.clone()),
            }
        }
        Ok(Value::Array(flat))
    })
}

fn index_of_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$indexOf", input)?;
        let items = util::as_array("$indexOf", util::require_field("$indexOf", obj, "input")?)?;
        let needle = util::require_field("$indexOf", obj, "value")?;
        let position = items
            .iter()
            .position(|item| util::deep_equal(item, needle))
            .map(|i| i as i64)
            .unwrap_or(-1);
        Ok(Value::Number(Number::from(position)))
    })
}

fn includes_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$includes", input)?;
        let items = util::as_array("$includes", util::require_field("$includes", obj, "input")?)?;
        let needle = util::require_field("$includes", obj, "value")?;
        Ok(Value::Bool(
            items.iter().any(|item| util::deep_equal(item, needle)),
        ))
    })
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { key: "$map", apply: map_eval, defer_input: true },
        OperatorDefinition { key: "$filter", apply: filter_eval, defer_input: true },
        OperatorDefinition { key: "$reduce", apply: reduce_eval, defer_input: true },
        OperatorDefinition { key: "$size", apply: size_eval, defer_input: false },
        OperatorDefinition { key: "$arrayFirst", apply: array_first_eval, defer_input: false },
        OperatorDefinition { key: "$arrayLast", apply: array_last_eval, defer_input: false },
        OperatorDefinition { key: "$arrayElemAt", apply: array_elem_at_eval, defer_input: false },
        OperatorDefinition { key: "$slice", apply: slice_eval, defer_input: false },
        OperatorDefinition { key: "$reverse", apply: reverse_eval, defer_input: false },
        OperatorDefinition { key: "$sort", apply: sort_eval, defer_input: false },
        OperatorDefinition { key: "$unique", apply: unique_eval, defer_input: false },
        OperatorDefinition { key: "$flatten", apply: flatten_eval, defer_input: false },
        OperatorDefinition { key: "$indexOf", apply: index_of_eval, defer_input: false },
        OperatorDefinition { key: "$includes", apply: includes_eval, defer_input: false },
    ]
}
