//! Arithmetic operators.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::fallback;
use crate::operator::OperatorDefinition;
use crate::util;
use serde_json::Value;

fn add_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let nums = util::num_list("$add", input)?;
        Ok(util::number(nums.iter().sum()))
    })
}

fn subtract_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let nums = util::num_list("$subtract", input)?;
        match nums.split_first() {
            Some((first, rest)) => Ok(util::number(rest.iter().fold(*first, |acc, n| acc - n))),
            None => Err(OperatorError::invalid_input(
                "$subtract",
                "a non-empty array of numbers",
                input,
            )),
        }
    })
}

fn multiply_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let nums = util::num_list("$multiply", input)?;
        Ok(util::number(nums.iter().product()))
    })
}

fn divide_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (dividend, divisor) = util::binary_numeric("$divide", input, "dividend", "divisor")?;
        if divisor == 0.0 {
            return Err(OperatorError::DivisionByZero);
        }
        Ok(util::number(dividend / divisor))
    })
}

fn mod_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (dividend, divisor) = util::binary_numeric("$mod", input, "dividend", "divisor")?;
        if divisor == 0.0 {
            return Err(OperatorError::DivisionByZero);
        }
        // `%` keeps the dividend's sign (JS remainder, not modulus).
        Ok(util::number(dividend % divisor))
    })
}

fn pow_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (base, exponent) = util::binary_numeric("$pow", input, "base", "exponent")?;
        let result = base.powf(exponent);
        if !result.is_finite() {
            return Err(OperatorError::NotFinite);
        }
        Ok(util::number(result))
    })
}

fn sqrt_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        let n = util::num(value)?;
        if n < 0.0 {
            return Err(OperatorError::NegativeSqrt);
        }
        Ok(util::number(n.sqrt()))
    })
}

fn abs_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(util::number(util::num(value)?.abs())))
}

fn round_to(n: f64, precision: i32) -> f64 {
    if precision == 0 {
        return n.round();
    }
    let factor = 10f64.powi(precision);
    (n * factor).round() / factor
}

// Half-away-from-zero, optional decimal precision.
fn round_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (value, precision) = match input {
            Value::Object(map) => (
                util::require_field("$round", map, "value")?,
                match map.get("precision") {
                    Some(p) => util::num(p)? as i32,
                    None => 0,
                },
            ),
            other => (other, 0),
        };
        Ok(util::number(round_to(util::num(value)?, precision)))
    })
}

fn ceil_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(util::number(util::num(value)?.ceil())))
}

fn floor_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(util::number(util::num(value)?.floor())))
}

fn trunc_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(util::number(util::num(value)?.trunc())))
}

fn min_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let nums = util::num_list("$min", input)?;
        Ok(nums
            .into_iter()
            .reduce(f64::min)
            .map(util::number)
            .unwrap_or(Value::Null))
    })
}

fn max_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let nums = util::num_list("$max", input)?;
        Ok(nums
            .into_iter()
            .reduce(f64::max)
            .map(util::number)
            .unwrap_or(Value::Null))
    })
}

fn sum_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let nums = util::num_list("$sum", input)?;
        Ok(util::number(nums.iter().sum()))
    })
}

fn avg_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let nums = util::num_list("$avg", input)?;
        if nums.is_empty() {
            return Ok(Value::Null);
        }
        let total: f64 = nums.iter().sum();
        Ok(util::number(total / nums.len() as f64))
    })
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { key: "$add", apply: add_eval, defer_input: false },
        OperatorDefinition { key: "$subtract", apply: subtract_eval, defer_input: false },
        OperatorDefinition { key: "$multiply", apply: multiply_eval, defer_input: false },
        OperatorDefinition { key: "$divide", apply: divide_eval, defer_input: false },
        OperatorDefinition { key: "$mod", apply: mod_eval, defer_input: false },
        OperatorDefinition { key: "$pow", apply: pow_eval, defer_input: false },
        OperatorDefinition { key: "$sqrt", apply: sqrt_eval, defer_input: false },
        OperatorDefinition { key: "$abs", apply: abs_eval, defer_input: false },
        OperatorDefinition { key: "$round", apply: round_eval, defer_input: false },
        OperatorDefinition { key: "$ceil", apply: ceil_eval, defer_input: false },
        OperatorDefinition { key: "$floor", apply: floor_eval, defer_input: false },
        OperatorDefinition { key: "$trunc", apply: trunc_eval, defer_input: false },
        OperatorDefinition { key: "$min", apply: min_eval, defer_input: false },
        OperatorDefinition { key: "$max", apply: max_eval, defer_input: false },
        OperatorDefinition { key: "$sum", apply: sum_eval, defer_input: false },
        OperatorDefinition { key: "$avg", apply: avg_eval, defer_input: false },
    ]
}
