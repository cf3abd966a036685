//! Integration tests for the built-in operator catalog.

use forgefy::resolve_expression;
use serde_json::{json, Value};

fn check(expression: Value, expected: Value, data: Value) {
    let result = resolve_expression(&data, &expression)
        .unwrap_or_else(|e| panic!("resolve({}) failed: {}", expression, e));
    assert_eq!(result, expected, "expression: {}", expression);
}

fn check_err(expression: Value, data: Value) -> String {
    resolve_expression(&data, &expression)
        .err()
        .unwrap_or_else(|| panic!("expected error for {}", expression))
        .to_string()
}

// ----------------------------------------------------------------- Arithmetic

#[test]
fn test_add() {
    check(json!({"$add": [1, 2]}), json!(3), json!(null));
    check(json!({"$add": [1, 2, 3, 4]}), json!(10), json!(null));
    check(json!({"$add": [0.5, 0.25]}), json!(0.75), json!(null));
    check(json!({"$add": ["2", "2"]}), json!(4), json!(null));
    check(json!({"$add": [true, false]}), json!(1), json!(null));
    check(json!({"$add": ["$a", "$b"]}), json!(3), json!({"a": 1, "b": 2}));
    check(json!({"$add": [1, {"$add": [1, 1]}]}), json!(3), json!(null));
}

#[test]
fn test_add_rejects_non_numbers() {
    let err = check_err(json!({"$add": [1, null]}), json!(null));
    assert_eq!(err, "NOT_A_NUMBER: null");
    let err = check_err(json!({"$add": 5}), json!(null));
    assert_eq!(err, "\"$add\" operator expects an array input, got: 5");
}

#[test]
fn test_subtract() {
    check(json!({"$subtract": [10, 2, 3]}), json!(5), json!(null));
    check(json!({"$subtract": [5]}), json!(5), json!(null));
    check(json!({"$subtract": [1, 2]}), json!(-1), json!(null));
    let err = check_err(json!({"$subtract": []}), json!(null));
    assert!(err.contains("non-empty"), "got: {}", err);
}

#[test]
fn test_multiply() {
    check(json!({"$multiply": [2, 3, 4]}), json!(24), json!(null));
    check(json!({"$multiply": [0.5, 10]}), json!(5), json!(null));
}

#[test]
fn test_divide() {
    check(json!({"$divide": [10, 4]}), json!(2.5), json!(null));
    check(
        json!({"$divide": {"dividend": 10, "divisor": 2}}),
        json!(5),
        json!(null),
    );
    let err = check_err(json!({"$divide": [1, 0]}), json!(null));
    assert_eq!(err, "DIVISION_BY_ZERO");
}

#[test]
fn test_mod_remainder() {
    check(
        json!({"$mod": {"dividend": "$value", "divisor": "$divisor"}}),
        json!(1),
        json!({"value": 10, "divisor": 3}),
    );
    check(json!({"$mod": [10, 3]}), json!(1), json!(null));
    // Remainder keeps the dividend's sign.
    check(
        json!({"$mod": {"dividend": -10, "divisor": 3}}),
        json!(-1),
        json!(null),
    );
}

#[test]
fn test_mod_by_zero() {
    let err = check_err(
        json!({"$mod": {"dividend": 10, "divisor": 0}}),
        json!(null),
    );
    assert_eq!(err, "DIVISION_BY_ZERO");
    check(
        json!({"$mod": {"dividend": "$value", "divisor": "$divisor", "fallback": -1}}),
        json!(-1),
        json!({"value": 10, "divisor": 0}),
    );
}

#[test]
fn test_pow() {
    check(
        json!({"$pow": {"base": "$base", "exponent": "$exponent"}}),
        json!(8),
        json!({"base": 2, "exponent": 3}),
    );
    check(json!({"$pow": [2, 10]}), json!(1024), json!(null));
    let err = check_err(
        json!({"$pow": {"base": 0, "exponent": -1}}),
        json!(null),
    );
    assert_eq!(err, "NOT_FINITE");
}

#[test]
fn test_sqrt() {
    check(json!({"$sqrt": 9}), json!(3), json!(null));
    check(json!({"$sqrt": 2}), json!(2f64.sqrt()), json!(null));
    let err = check_err(json!({"$sqrt": -1}), json!(null));
    assert_eq!(err, "NEGATIVE_SQRT");
    check(json!({"$sqrt": {"value": -4, "fallback": 0}}), json!(0), json!(null));
}

#[test]
fn test_abs() {
    check(json!({"$abs": -5}), json!(5), json!(null));
    check(json!({"$abs": 3.5}), json!(3.5), json!(null));
    check(json!({"$abs": "$n"}), json!(2), json!({"n": -2}));
}

#[test]
fn test_round_half_away_from_zero() {
    check(json!({"$round": 2.4}), json!(2), json!(null));
    check(json!({"$round": 2.5}), json!(3), json!(null));
    check(json!({"$round": -2.5}), json!(-3), json!(null));
    check(
        json!({"$round": {"value": 3.14159, "precision": 2}}),
        json!(3.14),
        json!(null),
    );
    check(json!({"$round": {"value": 2.5}}), json!(3), json!(null));
}

#[test]
fn test_ceil_floor_trunc() {
    check(json!({"$ceil": 2.1}), json!(3), json!(null));
    check(json!({"$ceil": -2.1}), json!(-2), json!(null));
    check(json!({"$floor": 2.9}), json!(2), json!(null));
    check(json!({"$floor": -2.1}), json!(-3), json!(null));
    check(json!({"$trunc": 2.9}), json!(2), json!(null));
    check(json!({"$trunc": -2.9}), json!(-2), json!(null));
}

#[test]
fn test_min_max() {
    check(json!({"$min": [3, 1, 2]}), json!(1), json!(null));
    check(json!({"$max": [3, 1, 2]}), json!(3), json!(null));
    check(json!({"$max": ["5", 2]}), json!(5), json!(null));
    check(json!({"$min": []}), json!(null), json!(null));
    check(json!({"$max": "$visits"}), json!(9), json!({"visits": [3, 9, 4]}));
}

#[test]
fn test_sum_avg() {
    check(json!({"$sum": [1, 2, 3]}), json!(6), json!(null));
    check(json!({"$sum": []}), json!(0), json!(null));
    check(json!({"$avg": [2, 4, 6]}), json!(4), json!(null));
    check(json!({"$avg": [1, 2]}), json!(1.5), json!(null));
    check(json!({"$avg": []}), json!(null), json!(null));
}

// ----------------------------------------------------------------- String

#[test]
fn test_to_string() {
    check(json!({"$toString": 2}), json!("2"), json!(null));
    check(json!({"$toString": 2.5}), json!("2.5"), json!(null));
    check(json!({"$toString": true}), json!("true"), json!(null));
    check(json!({"$toString": null}), json!("null"), json!(null));
    // Compound values render as compact JSON.
    check(json!({"$toString": [1, 2]}), json!("[1,2]"), json!(null));
    check(
        json!({"$toString": {"value": {"a": 1}}}),
        json!(r#"{"a":1}"#),
        json!(null),
    );
}

#[test]
fn test_case_and_trim() {
    check(json!({"$toUpper": "abc"}), json!("ABC"), json!(null));
    check(json!({"$toLower": "AbC"}), json!("abc"), json!(null));
    check(json!({"$trim": "  hi  "}), json!("hi"), json!(null));
    check(json!({"$toUpper": 7}), json!("7"), json!(null));
}

#[test]
fn test_concat() {
    check(json!({"$concat": ["a", 1, true]}), json!("a1true"), json!(null));
    check(
        json!({"$concat": ["$first", " ", "$last"]}),
        json!("Ada Lovelace"),
        json!({"first": "Ada", "last": "Lovelace"}),
    );
}

#[test]
fn test_split() {
    check(
        json!({"$split": {"input": "a,b,c", "delimiter": ","}}),
        json!(["a", "b", "c"]),
        json!(null),
    );
    check(
        json!({"$split": {"input": "abc", "delimiter": ""}}),
        json!(["a", "b", "c"]),
        json!(null),
    );
    check(
        json!({"$split": {"input": "", "delimiter": ","}}),
        json!([""]),
        json!(null),
    );
}

#[test]
fn test_join() {
    check(
        json!({"$join": {"input": ["a", "b"], "delimiter": "-"}}),
        json!("a-b"),
        json!(null),
    );
    check(json!({"$join": {"input": [1, 2]}}), json!("1,2"), json!(null));
    check(json!({"$join": {"input": []}}), json!(""), json!(null));
}

#[test]
fn test_substring() {
    check(
        json!({"$substring": {"input": "hello", "start": 1, "end": 3}}),
        json!("el"),
        json!(null),
    );
    // Out-of-order bounds swap, like JS substring.
    check(
        json!({"$substring": {"input": "hello", "start": 3, "end": 1}}),
        json!("el"),
        json!(null),
    );
    check(
        json!({"$substring": {"input": "hello", "start": 0, "end": 99}}),
        json!("hello"),
        json!(null),
    );
    check(
        json!({"$substring": {"input": "hello", "start": 2}}),
        json!("llo"),
        json!(null),
    );
}

#[test]
fn test_pad() {
    check(
        json!({"$padStart": {"input": "5", "length": 3, "pad": "0"}}),
        json!("005"),
        json!(null),
    );
    check(
        json!({"$padEnd": {"input": "ab", "length": 5, "pad": "xy"}}),
        json!("abxyx"),
        json!(null),
    );
    check(
        json!({"$padStart": {"input": "7", "length": 3}}),
        json!("  7"),
        json!(null),
    );
    check(
        json!({"$padStart": {"input": "long enough", "length": 3, "pad": "0"}}),
        json!("long enough"),
        json!(null),
    );
}

#[test]
fn test_replace_first_occurrence() {
    check(
        json!({"$replace": {"input": "a-b-c", "search": "-", "replacement": "+"}}),
        json!("a+b-c"),
        json!(null),
    );
    check(
        json!({"$replace": {"input": "abc", "search": "z", "replacement": "x"}}),
        json!("abc"),
        json!(null),
    );
}

#[test]
fn test_regex_replace() {
    check(
        json!({"$regexReplace": {"input": "a1b22c", "regex": "[0-9]+", "replacement": "#"}}),
        json!("a#b#c"),
        json!(null),
    );
    // Group references come from source data; values resolved out of the
    // source are never re-interpreted as paths.
    check(
        json!({"$regexReplace": {
            "input": "john smith",
            "regex": "(\\w+) (\\w+)",
            "replacement": "$swap",
        }}),
        json!("smith john"),
        json!({"swap": "$2 $1"}),
    );
}

#[test]
fn test_regex_match() {
    check(
        json!({"$regexMatch": {"input": "abc123", "regex": "\\d+"}}),
        json!(true),
        json!(null),
    );
    check(
        json!({"$regexMatch": {"input": "abc", "regex": "\\d"}}),
        json!(false),
        json!(null),
    );
    let err = check_err(
        json!({"$regexMatch": {"input": "x", "regex": "("}}),
        json!(null),
    );
    assert!(err.starts_with("INVALID_REGEX"), "got: {}", err);
}

// ----------------------------------------------------------------- Comparison

#[test]
fn test_eq_ne() {
    check(json!({"$eq": [1, 1]}), json!(true), json!(null));
    check(json!({"$eq": [1, 1.0]}), json!(true), json!(null));
    check(json!({"$eq": [{"a": 1}, {"a": 1}]}), json!(true), json!(null));
    check(json!({"$eq": ["a", "b"]}), json!(false), json!(null));
    check(json!({"$ne": [1, 2]}), json!(true), json!(null));
    check(json!({"$ne": [null, null]}), json!(false), json!(null));
}

#[test]
fn test_relational() {
    check(json!({"$gt": [2, 1]}), json!(true), json!(null));
    check(json!({"$gt": [1, 2]}), json!(false), json!(null));
    check(json!({"$gte": [2, 2]}), json!(true), json!(null));
    check(json!({"$lt": [1, 2]}), json!(true), json!(null));
    check(json!({"$lte": [3, 2]}), json!(false), json!(null));
    check(json!({"$gt": ["b", "a"]}), json!(true), json!(null));
    let err = check_err(json!({"$eq": [1]}), json!(null));
    assert!(err.contains("exactly two operands"), "got: {}", err);
}

#[test]
fn test_cmp() {
    check(json!({"$cmp": [1, 2]}), json!(-1), json!(null));
    check(json!({"$cmp": [2, 2]}), json!(0), json!(null));
    check(json!({"$cmp": [3, 2]}), json!(1), json!(null));
}

#[test]
fn test_in() {
    check(json!({"$in": [2, [1, 2, 3]]}), json!(true), json!(null));
    check(json!({"$in": [4, [1, 2, 3]]}), json!(false), json!(null));
    check(json!({"$in": ["ell", "hello"]}), json!(true), json!(null));
    let err = check_err(json!({"$in": [1, 5]}), json!(null));
    assert!(err.contains("array or string haystack"), "got: {}", err);
}

// ----------------------------------------------------------------- Logical

#[test]
fn test_and_or_not() {
    check(json!({"$and": [true, 1, "x"]}), json!(true), json!(null));
    check(json!({"$and": [true, 0]}), json!(false), json!(null));
    check(json!({"$or": [false, "", 2]}), json!(true), json!(null));
    check(json!({"$or": [false, null]}), json!(false), json!(null));
    check(json!({"$not": true}), json!(false), json!(null));
    check(json!({"$not": 0}), json!(true), json!(null));
    check(json!({"$not": "$missing"}), json!(true), json!({}));
}

#[test]
fn test_container_truthiness() {
    check(json!({"$and": [[]]}), json!(true), json!(null));
    check(json!({"$and": [{}]}), json!(true), json!(null));
}

#[test]
fn test_every_some_none() {
    check(json!({"$every": [1, true, "a"]}), json!(true), json!(null));
    check(json!({"$every": [1, null]}), json!(false), json!(null));
    check(json!({"$some": [0, "", 3]}), json!(true), json!(null));
    check(json!({"$none": [0, false]}), json!(true), json!(null));
    check(json!({"$none": [0, 1]}), json!(false), json!(null));
}

// ----------------------------------------------------------------- Conditional

#[test]
fn test_cond() {
    check(
        json!({"$cond": {"if": true, "then": "yes", "else": "no"}}),
        json!("yes"),
        json!(null),
    );
    check(
        json!({"$cond": {"if": "$active", "then": 1, "else": 2}}),
        json!(2),
        json!({"active": false}),
    );
    check(json!({"$cond": {"if": false, "then": 1}}), json!(null), json!(null));
    check(json!({"$cond": ["$flag", 1, 2]}), json!(1), json!({"flag": true}));
}

#[test]
fn test_switch() {
    let expr = json!({"$switch": {
        "branches": [
            {"case": {"$gt": ["$n", 100]}, "then": "large"},
            {"case": {"$gt": ["$n", 10]}, "then": "medium"},
        ],
        "default": "small",
    }});
    check(expr.clone(), json!("medium"), json!({"n": 42}));
    check(expr.clone(), json!("large"), json!({"n": 1000}));
    check(expr, json!("small"), json!({"n": 3}));
    check(
        json!({"$switch": {"branches": [{"case": false, "then": 1}]}}),
        json!(null),
        json!(null),
    );
}

#[test]
fn test_if_null() {
    check(json!({"$ifNull": ["$a.b.c", 1]}), json!(3), json!({"a": {"b": {"c": 3}}}));
    check(
        json!({"$ifNull": ["$a.b.c", 1]}),
        json!(1),
        json!({"a": {"b": {"c": null}}}),
    );
    check(json!({"$ifNull": [null, null]}), json!(null), json!(null));
}

#[test]
fn test_coalesce() {
    check(json!({"$coalesce": [null, null, 5, 6]}), json!(5), json!(null));
    check(
        json!({"$coalesce": ["$x", "$y", "fallback"]}),
        json!("fallback"),
        json!({}),
    );
}

#[test]
fn test_default() {
    check(
        json!({"$default": {"value": "$x", "default": 9}}),
        json!(9),
        json!({}),
    );
    check(
        json!({"$default": {"value": "$x", "default": 9}}),
        json!(4),
        json!({"x": 4}),
    );
    check(
        json!({"$default": {"value": false, "default": 9}}),
        json!(false),
        json!(null),
    );
}

// ----------------------------------------------------------------- Date

#[test]
fn test_to_date() {
    check(
        json!({"$toDate": "2023-01-15T10:30:00Z"}),
        json!("2023-01-15T10:30:00.000Z"),
        json!(null),
    );
    check(
        json!({"$toDate": "2023-01-15"}),
        json!("2023-01-15T00:00:00.000Z"),
        json!(null),
    );
    check(
        json!({"$toDate": "2023-01-15T10:30:00+02:00"}),
        json!("2023-01-15T08:30:00.000Z"),
        json!(null),
    );
}

#[test]
fn test_to_date_timestamps() {
    check(json!({"$toDate": 0}), json!("1970-01-01T00:00:00.000Z"), json!(null));
    check(json!({"$toDate": 86400}), json!("1970-01-02T00:00:00.000Z"), json!(null));
    // Same instant as seconds and as milliseconds.
    check(
        json!({"$toDate": 1673778600i64}),
        json!("2023-01-15T10:30:00.000Z"),
        json!(null),
    );
    check(
        json!({"$toDate": 1673778600000i64}),
        json!("2023-01-15T10:30:00.000Z"),
        json!(null),
    );
}

#[test]
fn test_to_date_invalid() {
    let err = check_err(json!({"$toDate": "not a date"}), json!(null));
    assert_eq!(err, "INVALID_DATE: not a date");
    check(
        json!({"$toDate": {"value": "nope", "fallback": null}}),
        json!(null),
        json!(null),
    );
}

#[test]
fn test_date_diff() {
    check(
        json!({"$dateDiff": {"start": "2023-01-01", "end": "2023-01-15", "unit": "days"}}),
        json!(14),
        json!(null),
    );
    check(
        json!({"$dateDiff": {"start": 0, "end": 90000, "unit": "days"}}),
        json!(1),
        json!(null),
    );
    check(
        json!({"$dateDiff": {"start": 0, "end": 90000, "unit": "hours"}}),
        json!(25),
        json!(null),
    );
    check(
        json!({"$dateDiff": {"start": "2023-01-15", "end": "2023-01-01", "unit": "weeks"}}),
        json!(-2),
        json!(null),
    );
    let err = check_err(
        json!({"$dateDiff": {"start": 0, "end": 0, "unit": "fortnights"}}),
        json!(null),
    );
    assert!(err.contains("unit"), "got: {}", err);
}

#[test]
fn test_date_add_subtract() {
    check(
        json!({"$dateAdd": {"date": "2023-01-15T10:30:00Z", "amount": 1, "unit": "days"}}),
        json!("2023-01-16T10:30:00.000Z"),
        json!(null),
    );
    check(
        json!({"$dateAdd": {"date": "2023-01-15T10:30:00Z", "amount": 90, "unit": "minutes"}}),
        json!("2023-01-15T12:00:00.000Z"),
        json!(null),
    );
    check(
        json!({"$dateSubtract": {"date": "2023-01-15T10:30:00Z", "amount": 2, "unit": "hours"}}),
        json!("2023-01-15T08:30:00.000Z"),
        json!(null),
    );
}

#[test]
fn test_format_date() {
    check(
        json!({"$formatDate": {"date": "2023-01-15T10:30:00Z", "format": "%Y-%m-%d"}}),
        json!("2023-01-15"),
        json!(null),
    );
    check(
        json!({"$formatDate": {"date": 1673778600, "format": "%H:%M"}}),
        json!("10:30"),
        json!(null),
    );
    let err = check_err(
        json!({"$formatDate": {"date": 0, "format": "%Q"}}),
        json!(null),
    );
    assert!(err.contains("strftime"), "got: {}", err);
}

// ----------------------------------------------------------------- Type

#[test]
fn test_to_number() {
    check(json!({"$toNumber": "42"}), json!(42), json!(null));
    check(json!({"$toNumber": " 3.5 "}), json!(3.5), json!(null));
    check(json!({"$toNumber": true}), json!(1), json!(null));
    check(json!({"$toNumber": false}), json!(0), json!(null));
    check(json!({"$toNumber": 7}), json!(7), json!(null));
    let err = check_err(json!({"$toNumber": "abc"}), json!(null));
    assert_eq!(err, "NOT_A_NUMBER: abc");
}

#[test]
fn test_to_bool() {
    check(json!({"$toBool": 1}), json!(true), json!(null));
    check(json!({"$toBool": ""}), json!(false), json!(null));
    check(json!({"$toBool": []}), json!(true), json!(null));
    check(json!({"$toBool": "$missing"}), json!(false), json!({}));
}

#[test]
fn test_type_of() {
    check(json!({"$type": 5}), json!("number"), json!(null));
    check(json!({"$type": "x"}), json!("string"), json!(null));
    check(json!({"$type": true}), json!("boolean"), json!(null));
    check(json!({"$type": [1]}), json!("array"), json!(null));
    check(json!({"$type": null}), json!("null"), json!(null));
    check(json!({"$type": "$user"}), json!("object"), json!({"user": {}}));
}

#[test]
fn test_type_predicates() {
    check(json!({"$isNumber": 5}), json!(true), json!(null));
    check(json!({"$isNumber": "5"}), json!(false), json!(null));
    check(json!({"$isString": "x"}), json!(true), json!(null));
    check(json!({"$isBoolean": false}), json!(true), json!(null));
    check(json!({"$isArray": [1]}), json!(true), json!(null));
    check(json!({"$isObject": {"a": 1, "b": 2}}), json!(true), json!(null));
    check(json!({"$isNull": null}), json!(true), json!(null));
    check(json!({"$isNull": "$missing"}), json!(true), json!({}));
}

#[test]
fn test_exists() {
    let data = json!({"a": {"b": null}, "items": [1]});
    // A key holding null still exists.
    check(json!({"$exists": "$a.b"}), json!(true), data.clone());
    check(json!({"$exists": "$a.c"}), json!(false), data.clone());
    check(json!({"$exists": "$a"}), json!(true), data.clone());
    check(json!({"$exists": "$missing"}), json!(false), data.clone());
    check(json!({"$exists": "$items.0"}), json!(true), data.clone());
    check(json!({"$exists": "$items.1"}), json!(false), data);
}

#[test]
fn test_exists_non_path_input() {
    check(json!({"$exists": 5}), json!(true), json!(null));
    check(json!({"$exists": null}), json!(false), json!(null));
    check(json!({"$exists": {"$ifNull": [null, 1]}}), json!(true), json!(null));
}

// ----------------------------------------------------------------- Array

#[test]
fn test_map() {
    check(
        json!({"$map": {"input": "$nums", "apply": {"$multiply": ["$current", 2]}}}),
        json!([2, 4, 6]),
        json!({"nums": [1, 2, 3]}),
    );
    check(
        json!({"$map": {"input": [10, 20], "apply": "$index"}}),
        json!([0, 1]),
        json!(null),
    );
    check(
        json!({"$map": {"input": "$users", "apply": "$current.name"}}),
        json!(["ann", "bob"]),
        json!({"users": [{"name": "ann"}, {"name": "bob"}]}),
    );
}

#[test]
fn test_map_with_nested_blueprint() {
    check(
        json!({"$map": {"input": "$users", "apply": {
            "id": "$index",
            "name": {"$toUpper": "$current.name"},
        }}}),
        json!([
            {"id": 0, "name": "ANN"},
            {"id": 1, "name": "BOB"},
        ]),
        json!({"users": [{"name": "ann"}, {"name": "bob"}]}),
    );
}

#[test]
fn test_filter() {
    check(
        json!({"$filter": {"input": "$nums", "condition": {"$gt": ["$current", 1]}}}),
        json!([2, 3]),
        json!({"nums": [1, 2, 3]}),
    );
    check(
        json!({"$filter": {"input": [1, 2], "condition": false}}),
        json!([]),
        json!(null),
    );
}

#[test]
fn test_reduce() {
    check(
        json!({"$reduce": {
            "input": "$nums",
            "initialValue": 0,
            "apply": {"$add": ["$accumulated", "$current"]},
        }}),
        json!(6),
        json!({"nums": [1, 2, 3]}),
    );
    check(
        json!({"$reduce": {
            "input": ["a", "b", "c"],
            "initialValue": "",
            "apply": {"$concat": ["$accumulated", "$current"]},
        }}),
        json!("abc"),
        json!(null),
    );
    check(
        json!({"$reduce": {"input": [], "initialValue": 42, "apply": "$current"}}),
        json!(42),
        json!(null),
    );
}

#[test]
fn test_array_transforms_reject_non_arrays() {
    let err = check_err(
        json!({"$map": {"input": 5, "apply": "$current"}}),
        json!(null),
    );
    assert!(err.contains("array input"), "got: {}", err);
    check(
        json!({"$map": {"input": "$n", "apply": "$current", "fallback": "$backup"}}),
        json!([1]),
        json!({"n": 5, "backup": [1]}),
    );
}

#[test]
fn test_size() {
    check(json!({"$size": [1, 2, 3]}), json!(3), json!(null));
    check(json!({"$size": "hello"}), json!(5), json!(null));
    check(json!({"$size": "$user"}), json!(2), json!({"user": {"a": 1, "b": 2}}));
    let err = check_err(json!({"$size": 5}), json!(null));
    assert!(err.contains("array, object or string"), "got: {}", err);
}

#[test]
fn test_array_first_last() {
    check(json!({"$arrayFirst": [5, 6]}), json!(5), json!(null));
    check(json!({"$arrayLast": [5, 6]}), json!(6), json!(null));
    check(json!({"$arrayFirst": []}), json!(null), json!(null));
    check(json!({"$arrayLast": []}), json!(null), json!(null));
}

#[test]
fn test_array_elem_at() {
    check(
        json!({"$arrayElemAt": {"input": [1, 2, 3], "index": 1}}),
        json!(2),
        json!(null),
    );
    check(
        json!({"$arrayElemAt": {"input": [1, 2, 3], "index": -1}}),
        json!(3),
        json!(null),
    );
    check(
        json!({"$arrayElemAt": {"input": [1, 2, 3], "index": 9}}),
        json!(null),
        json!(null),
    );
    check(
        json!({"$arrayElemAt": {"input": [1, 2, 3], "index": -9}}),
        json!(null),
        json!(null),
    );
}

#[test]
fn test_slice() {
    check(
        json!({"$slice": {"input": [0, 1, 2, 3, 4], "start": 1, "end": 3}}),
        json!([1, 2]),
        json!(null),
    );
    check(
        json!({"$slice": {"input": [0, 1, 2, 3, 4], "start": -2}}),
        json!([3, 4]),
        json!(null),
    );
    check(
        json!({"$slice": {"input": [0, 1, 2], "start": 99}}),
        json!([]),
        json!(null),
    );
}

#[test]
fn test_reverse() {
    check(json!({"$reverse": [1, 2, 3]}), json!([3, 2, 1]), json!(null));
    check(json!({"$reverse": []}), json!([]), json!(null));
}

#[test]
fn test_sort() {
    check(json!({"$sort": [3, 1, 2]}), json!([1, 2, 3]), json!(null));
    // Numeric order, not lexicographic, when everything is a number.
    check(json!({"$sort": [10, 9, 2]}), json!([2, 9, 10]), json!(null));
    check(json!({"$sort": ["b", "a", "c"]}), json!(["a", "b", "c"]), json!(null));
}

#[test]
fn test_unique() {
    check(json!({"$unique": [1, 2, 1, 3, 2]}), json!([1, 2, 3]), json!(null));
    check(
        json!({"$unique": [{"a": 1}, {"a": 1}, {"a": 2}]}),
        json!([{"a": 1}, {"a": 2}]),
        json!(null),
    );
}

#[test]
fn test_flatten_one_level() {
    check(
        json!({"$flatten": [[1, 2], [3], [4]]}),
        json!([1, 2, 3, 4]),
        json!(null),
    );
    check(
        json!({"$flatten": [[1, [2]], 3]}),
        json!([1, [2], 3]),
        json!(null),
    );
}

#[test]
fn test_index_of_includes() {
    check(
        json!({"$indexOf": {"input": [1, 2, 3], "value": 2}}),
        json!(1),
        json!(null),
    );
    check(
        json!({"$indexOf": {"input": [1, 2, 3], "value": 9}}),
        json!(-1),
        json!(null),
    );
    check(
        json!({"$includes": {"input": [1, 2], "value": 2}}),
        json!(true),
        json!(null),
    );
    check(
        json!({"$includes": {"input": [1, 2], "value": 9}}),
        json!(false),
        json!(null),
    );
}

// ----------------------------------------------------------------- Fallback

#[test]
fn test_fallback_covers_domain_errors() {
    check(
        json!({"$divide": {"dividend": 1, "divisor": 0, "fallback": null}}),
        json!(null),
        json!(null),
    );
    check(
        json!({"$toNumber": {"value": "abc", "fallback": 0}}),
        json!(0),
        json!(null),
    );
}

#[test]
fn test_fallback_covers_structural_errors() {
    // Missing required fields still route through the fallback.
    check(json!({"$split": {"fallback": "x"}}), json!("x"), json!(null));
    check(
        json!({"$arrayElemAt": {"input": 5, "index": 0, "fallback": "bad"}}),
        json!("bad"),
        json!(null),
    );
}

#[test]
fn test_fallback_resolves_from_source() {
    check(
        json!({"$toNumber": {"value": "abc", "fallback": "$backup"}}),
        json!(7),
        json!({"backup": 7}),
    );
    // A fallback pulled from source data is substituted as-is, even when
    // it looks like a path.
    check(
        json!({"$toNumber": {"value": "abc", "fallback": "$fb"}}),
        json!("$keep"),
        json!({"fb": "$keep"}),
    );
}

#[test]
fn test_missing_fallback_rethrows_original() {
    assert_eq!(
        check_err(json!({"$mod": {"dividend": 1, "divisor": 0}}), json!(null)),
        "DIVISION_BY_ZERO",
    );
    assert_eq!(
        check_err(json!({"$sqrt": -9}), json!(null)),
        "NEGATIVE_SQRT",
    );
}
