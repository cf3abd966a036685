//! Conditional and null-handling operators.
//!
//! `$cond`, `$ifNull`, `$coalesce` and `$default` operate on pre-resolved
//! values: an erroring branch fails the call even when untaken, unless the
//! inner operator carries its own fallback. `$switch` is the exception: its
//! branches sit inside an array, which resolution leaves untouched, so it
//! defers and resolves each `case` in order, then only the matching `then`.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::fallback;
use crate::operator::OperatorDefinition;
use crate::resolver;
use crate::util;
use serde_json::Value;

fn cond_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (condition, then_value, else_value) = match input {
            Value::Array(items) if items.len() == 3 => (&items[0], &items[1], Some(&items[2])),
            Value::Object(map) => (
                util::require_field("$cond", map, "if")?,
                util::require_field("$cond", map, "then")?,
                map.get("else"),
            ),
            _ => {
                return Err(OperatorError::invalid_input(
                    "$cond",
                    "{if, then, else} fields or a [if, then, else] triple",
                    input,
                ))
            }
        };
        Ok(if util::is_truthy(condition) {
            then_value.clone()
        } else {
            else_value.cloned().unwrap_or(Value::Null)
        })
    })
}

fn switch_eval(input: &Value, ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_raw_fallback(input, ctx, || {
        let obj = util::as_object("$switch", input)?;
        let branches = util::as_array("$switch", util::require_field("$switch", obj, "branches")?)?;
        for branch in branches {
            let arm = match branch {
                Value::Object(map) => map,
                other => {
                    return Err(OperatorError::invalid_input(
                        "$switch",
                        "{case, then} branch objects",
                        other,
                    ))
                }
            };
            let case = resolver::resolve_in(util::require_field("$switch", arm, "case")?, ctx)?;
            if util::is_truthy(&case) {
                return resolver::resolve_in(util::require_field("$switch", arm, "then")?, ctx);
            }
        }
        match obj.get("default") {
            Some(default) => resolver::resolve_in(default, ctx),
            None => Ok(Value::Null),
        }
    })
}

fn first_non_null(operator: &'static str, input: &Value) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let items = util::as_array(operator, input)?;
        Ok(items
            .iter()
            .find(|item| !item.is_null())
            .cloned()
            .unwrap_or(Value::Null))
    })
}

fn if_null_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    first_non_null("$ifNull", input)
}

fn coalesce_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    first_non_null("$coalesce", input)
}

fn default_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$default", input)?;
        let value = util::require_field("$default", obj, "value")?;
        let substitute = util::require_field("$default", obj, "default")?;
        Ok(if value.is_null() {
            substitute.clone()
        } else {
            value.clone()
        })
    })
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { key: "$cond", apply: cond_eval, defer_input: false },
        OperatorDefinition { key: "$switch", apply: switch_eval, defer_input: true },
        OperatorDefinition { key: "$ifNull", apply: if_null_eval, defer_input: false },
        OperatorDefinition { key: "$coalesce", apply: coalesce_eval, defer_input: false },
        OperatorDefinition { key: "$default", apply: default_eval, defer_input: false },
    ]
}
