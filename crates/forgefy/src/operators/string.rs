//! String operators.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::fallback;
use crate::operator::OperatorDefinition;
use crate::util;
use regex::Regex;
use serde_json::{Map, Value};

fn field_str(
    operator: &'static str,
    obj: &Map<String, Value>,
    field: &str,
) -> Result<String, OperatorError> {
    Ok(util::str_val(util::require_field(operator, obj, field)?))
}

fn to_string_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(Value::String(util::str_val(value))))
}

fn to_upper_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        Ok(Value::String(util::str_val(value).to_uppercase()))
    })
}

fn to_lower_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        Ok(Value::String(util::str_val(value).to_lowercase()))
    })
}

fn trim_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| {
        Ok(Value::String(util::str_val(value).trim().to_string()))
    })
}

fn concat_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let items = util::as_array("$concat", input)?;
        let mut result = String::new();
        for item in items {
            result.push_str(&util::str_val(item));
        }
        Ok(Value::String(result))
    })
}

fn split_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$split", input)?;
        let subject = field_str("$split", obj, "input")?;
        let delimiter = field_str("$split", obj, "delimiter")?;
        let pieces: Vec<Value> = if delimiter.is_empty() {
            subject
                .chars()
                .map(|c| Value::String(c.to_string()))
                .collect()
        } else {
            subject
                .split(delimiter.as_str())
                .map(|piece| Value::String(piece.to_string()))
                .collect()
        };
        Ok(Value::Array(pieces))
    })
}

fn join_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$join", input)?;
        let items = util::as_array("$join", util::require_field("$join", obj, "input")?)?;
        let delimiter = match obj.get("delimiter") {
            Some(d) => util::str_val(d),
            None => ",".to_string(),
        };
        let rendered: Vec<String> = items.iter().map(util::str_val).collect();
        Ok(Value::String(rendered.join(&delimiter)))
    })
}

// Character-indexed, with the clamp-and-swap range handling of JS
// `String.prototype.substring`.
fn substring_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$substring", input)?;
        let subject = field_str("$substring", obj, "input")?;
        let chars: Vec<char> = subject.chars().collect();
        let len = chars.len() as f64;
        let clamp = |v: f64| v.trunc().max(0.0).min(len) as usize;
        let start = clamp(util::num(util::require_field("$substring", obj, "start")?)?);
        let end = match obj.get("end") {
            Some(e) => clamp(util::num(e)?),
            None => chars.len(),
        };
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        Ok(Value::String(chars[lo..hi].iter().collect()))
    })
}

fn pad(subject: &str, target: usize, pad: &str, at_start: bool) -> String {
    let len = subject.chars().count();
    if len >= target || pad.is_empty() {
        return subject.to_string();
    }
    let fill: String = pad.chars().cycle().take(target - len).collect();
    if at_start {
        fill + subject
    } else {
        subject.to_string() + &fill
    }
}

fn pad_input(
    operator: &'static str,
    input: &Value,
) -> Result<(String, usize, String), OperatorError> {
    let obj = util::as_object(operator, input)?;
    let subject = field_str(operator, obj, "input")?;
    let length = util::num(util::require_field(operator, obj, "length")?)?
        .trunc()
        .max(0.0) as usize;
    let padding = match obj.get("pad") {
        Some(p) => util::str_val(p),
        None => " ".to_string(),
    };
    Ok((subject, length, padding))
}

fn pad_start_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (subject, length, padding) = pad_input("$padStart", input)?;
        Ok(Value::String(pad(&subject, length, &padding, true)))
    })
}

fn pad_end_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let (subject, length, padding) = pad_input("$padEnd", input)?;
        Ok(Value::String(pad(&subject, length, &padding, false)))
    })
}

fn replace_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$replace", input)?;
        let subject = field_str("$replace", obj, "input")?;
        let search = field_str("$replace", obj, "search")?;
        let replacement = field_str("$replace", obj, "replacement")?;
        Ok(Value::String(subject.replacen(&search, &replacement, 1)))
    })
}

fn compile(pattern: &str) -> Result<Regex, OperatorError> {
    Regex::new(pattern).map_err(|e| OperatorError::InvalidRegex(e.to_string()))
}

fn regex_replace_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$regexReplace", input)?;
        let subject = field_str("$regexReplace", obj, "input")?;
        let pattern = field_str("$regexReplace", obj, "regex")?;
        let replacement = field_str("$regexReplace", obj, "replacement")?;
        let re = compile(&pattern)?;
        Ok(Value::String(
            re.replace_all(&subject, replacement.as_str()).into_owned(),
        ))
    })
}

fn regex_match_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$regexMatch", input)?;
        let subject = field_str("$regexMatch", obj, "input")?;
        let pattern = field_str("$regexMatch", obj, "regex")?;
        Ok(Value::Bool(compile(&pattern)?.is_match(&subject)))
    })
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { key: "$toString", apply: to_string_eval, defer_input: false },
        OperatorDefinition { key: "$toUpper", apply: to_upper_eval, defer_input: false },
        OperatorDefinition { key: "$toLower", apply: to_lower_eval, defer_input: false },
        OperatorDefinition { key: "$trim", apply: trim_eval, defer_input: false },
        OperatorDefinition { key: "$concat", apply: concat_eval, defer_input: false },
        OperatorDefinition { key: "$split", apply: split_eval, defer_input: false },
        OperatorDefinition { key: "$join", apply: join_eval, defer_input: false },
        OperatorDefinition { key: "$substring", apply: substring_eval, defer_input: false },
        OperatorDefinition { key: "$padStart", apply: pad_start_eval, defer_input: false },
        OperatorDefinition { key: "$padEnd", apply: pad_end_eval, defer_input: false },
        OperatorDefinition { key: "$replace", apply: replace_eval, defer_input: false },
        OperatorDefinition { key: "$regexReplace", apply: regex_replace_eval, defer_input: false },
        OperatorDefinition { key: "$regexMatch", apply: regex_match_eval, defer_input: false },
    ]
}
