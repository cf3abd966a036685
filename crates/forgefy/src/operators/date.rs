//! Date operators, UTC throughout.
//!
//! Inputs are ISO-8601 strings or Unix timestamps; a timestamp counts
//! milliseconds when its magnitude reaches 1e12, seconds below that.
//! Outputs render as UTC ISO-8601 with millisecond precision.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::fallback;
use crate::operator::OperatorDefinition;
use crate::util;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

// The widest instant a JS Date can hold, in milliseconds from epoch.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

const MILLIS_THRESHOLD: f64 = 1e12;

fn parse_date(value: &Value) -> Result<DateTime<Utc>, OperatorError> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => {
            let raw = n
                .as_f64()
                .ok_or_else(|| OperatorError::InvalidDate(n.to_string()))?;
            let millis = if raw.abs() >= MILLIS_THRESHOLD {
                raw
            } else {
                raw * 1000.0
            };
            if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
                return Err(OperatorError::InvalidDate(n.to_string()));
            }
            Utc.timestamp_millis_opt(millis as i64)
                .single()
                .ok_or_else(|| OperatorError::InvalidDate(n.to_string()))
        }
        other => Err(OperatorError::InvalidDate(other.to_string())),
    }
}

fn parse_date_str(s: &str) -> Result<DateTime<Utc>, OperatorError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Zone-less fallbacks, read as UTC.
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for format in &formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(OperatorError::InvalidDate(s.to_string()))
}

fn render(date: DateTime<Utc>) -> Value {
    Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn unit_millis(operator: &'static str, unit: &Value) -> Result<f64, OperatorError> {
    let name = match unit {
        Value::String(s) => s.as_str(),
        other => return Err(OperatorError::invalid_input(operator, "a unit string", other)),
    };
    match name {
        "millisecond" | "milliseconds" => Ok(1.0),
        "second" | "seconds" => Ok(1_000.0),
        "minute" | "minutes" => Ok(60_000.0),
        "hour" | "hours" => Ok(3_600_000.0),
        "day" | "days" => Ok(86_400_000.0),
        "week" | "weeks" => Ok(604_800_000.0),
        _ => Err(OperatorError::invalid_input(
            operator,
            "a unit of millisecond/second/minute/hour/day/week",
            unit,
        )),
    }
}

fn to_date_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::unary(input, |value| Ok(render(parse_date(value)?)))
}

// Whole elapsed units from start to end, truncated toward zero.
fn date_diff_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$dateDiff", input)?;
        let start = parse_date(util::require_field("$dateDiff", obj, "start")?)?;
        let end = parse_date(util::require_field("$dateDiff", obj, "end")?)?;
        let per = unit_millis("$dateDiff", util::require_field("$dateDiff", obj, "unit")?)?;
        let elapsed = (end - start).num_milliseconds() as f64;
        Ok(util::number((elapsed / per).trunc()))
    })
}

fn shift(operator: &'static str, input: &Value, sign: f64) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object(operator, input)?;
        let date = parse_date(util::require_field(operator, obj, "date")?)?;
        let amount = util::num(util::require_field(operator, obj, "amount")?)?;
        let per = unit_millis(operator, util::require_field(operator, obj, "unit")?)?;
        let delta = Duration::milliseconds((sign * amount * per) as i64);
        let shifted = date
            .checked_add_signed(delta)
            .ok_or_else(|| OperatorError::InvalidDate(input.to_string()))?;
        Ok(render(shifted))
    })
}

fn date_add_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    shift("$dateAdd", input, 1.0)
}

fn date_subtract_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    shift("$dateSubtract", input, -1.0)
}

fn format_date_eval(input: &Value, _ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    fallback::with_fallback(input, || {
        let obj = util::as_object("$formatDate", input)?;
        let date = parse_date(util::require_field("$formatDate", obj, "date")?)?;
        let format_value = util::require_field("$formatDate", obj, "format")?;
        let format = match format_value {
            Value::String(s) => s,
            other => {
                return Err(OperatorError::invalid_input(
                    "$formatDate",
                    "a strftime format string",
                    other,
                ))
            }
        };
        // Collect items up front: formatting an Item::Error panics, a
        // parse-checked list cannot.
        let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(OperatorError::invalid_input(
                "$formatDate",
                "a valid strftime format string",
                format_value,
            ));
        }
        Ok(Value::String(
            date.format_with_items(items.into_iter()).to_string(),
        ))
    })
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { key: "$toDate", apply: to_date_eval, defer_input: false },
        OperatorDefinition { key: "$dateDiff", apply: date_diff_eval, defer_input: false },
        OperatorDefinition { key: "$dateAdd", apply: date_add_eval, defer_input: false },
        OperatorDefinition { key: "$dateSubtract", apply: date_subtract_eval, defer_input: false },
        OperatorDefinition { key: "$formatDate", apply: format_date_eval, defer_input: false },
    ]
}
