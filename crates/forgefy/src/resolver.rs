//! Expression classification and recursive resolution.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::operator::OperatorDefinition;
use crate::projection;
use crate::registry::OperatorRegistry;
use serde_json::{Map, Number, Value};

/// A blueprint value, classified once by shape.
///
/// Classification is purely syntactic except for the operator lookup: a
/// single-key `$`-object is an operator call only when its key is
/// registered.
pub enum Expression<'a> {
    /// Plain JSON returned as-is. Arrays land here too; see [`resolve_in`].
    Literal(&'a Value),
    /// `$`-prefixed dotted path.
    PathRef(&'a str),
    /// Single-key object whose key is a registered operator.
    OperatorCall {
        def: &'a OperatorDefinition,
        input: &'a Value,
    },
    /// Operator-shaped object whose key is not registered.
    UnknownOperator(&'a str),
    /// Any other plain object: a nested blueprint.
    NestedProjection(&'a Map<String, Value>),
}

/// Classifies a blueprint value against a registry.
pub fn classify<'a>(expression: &'a Value, registry: &'a OperatorRegistry) -> Expression<'a> {
    match expression {
        Value::String(s) if forgefy_path::is_path_ref(s) => Expression::PathRef(s.as_str()),
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some((key, input)) = map.iter().next() {
                    if key.starts_with('$') {
                        return match registry.get(key) {
                            Some(def) => Expression::OperatorCall { def, input },
                            None => Expression::UnknownOperator(key.as_str()),
                        };
                    }
                }
            }
            Expression::NestedProjection(map)
        }
        other => Expression::Literal(other),
    }
}

/// Resolves an expression within an execution context.
///
/// Resolution per class: literals (null included) pass through;
/// `$`-strings resolve as paths, with bound loop variables shadowing
/// source keys; registered operator objects dispatch; operator-shaped
/// objects with an unknown key resolve to `null` (lenient by contract);
/// any other plain object is forged as a nested blueprint over the same
/// source. Arrays are returned as-is — only operator inputs resolve array
/// slots (see [`resolve_args`]).
pub fn resolve_in(expression: &Value, ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    match classify(expression, ctx.registry()) {
        Expression::Literal(value) => Ok(value.clone()),
        Expression::PathRef(path) => Ok(resolve_path(path, ctx)),
        Expression::OperatorCall { def, input } => dispatch(def, input, ctx),
        Expression::UnknownOperator(_) => Ok(Value::Null),
        Expression::NestedProjection(_) => projection::forge(expression, ctx),
    }
}

/// Resolves a single expression against `source` using the default
/// registry.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// let source = json!({"a": 2, "b": 3});
/// let expr = json!({"$add": ["$a", "$b", 5]});
/// assert_eq!(forgefy::resolve_expression(&source, &expr).unwrap(), json!(10));
/// ```
pub fn resolve_expression(source: &Value, expression: &Value) -> Result<Value, OperatorError> {
    resolve_in(expression, &ExecutionContext::new(source))
}

/// Same as [`resolve_expression`], against a caller-built registry.
pub fn resolve_expression_with(
    source: &Value,
    expression: &Value,
    registry: &OperatorRegistry,
) -> Result<Value, OperatorError> {
    resolve_in(expression, &ExecutionContext::with_registry(source, registry))
}

/// Resolves an operator's raw input before dispatch.
///
/// Arrays resolve per slot; everything else goes straight through
/// [`resolve_in`] — object values resolve by key via the nested-blueprint
/// path, operator objects execute, paths look up, literals stand. Running
/// it over an already-resolved value is the identity.
pub fn resolve_args(input: &Value, ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    match input {
        Value::Array(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for item in items {
                resolved.push(resolve_in(item, ctx)?);
            }
            Ok(Value::Array(resolved))
        }
        other => resolve_in(other, ctx),
    }
}

fn dispatch(
    def: &OperatorDefinition,
    input: &Value,
    ctx: &ExecutionContext<'_>,
) -> Result<Value, OperatorError> {
    if def.defer_input {
        (def.apply)(input, ctx)
    } else {
        let resolved = resolve_args(input, ctx)?;
        (def.apply)(&resolved, ctx)
    }
}

/// Resolves a `$`-path. Reserved names (`$current`, `$index`,
/// `$accumulated`) read the loop bindings while bound and shadow source
/// keys of the same name; everything else walks the root source. A miss
/// is null.
fn resolve_path(path: &str, ctx: &ExecutionContext<'_>) -> Value {
    probe_path(path, ctx).unwrap_or(Value::Null)
}

/// Path lookup that keeps the hit/miss distinction, for presence checks.
///
/// A bound reserved root shadows the source: once `$current` is bound, a
/// miss under it stays a miss rather than falling through to a source key
/// named "current".
pub(crate) fn probe_path(path: &str, ctx: &ExecutionContext<'_>) -> Option<Value> {
    let segments = forgefy_path::parse_path(path);
    if let Some((&head, rest)) = segments.split_first() {
        match head {
            "current" => {
                if let Some(current) = ctx.current() {
                    return forgefy_path::get(current, rest).cloned();
                }
            }
            "index" => {
                if let Some(index) = ctx.index() {
                    return rest
                        .is_empty()
                        .then(|| Value::Number(Number::from(index as u64)));
                }
            }
            "accumulated" => {
                if let Some(accumulated) = ctx.accumulated() {
                    return forgefy_path::get(accumulated, rest).cloned();
                }
            }
            _ => {}
        }
    }
    forgefy_path::get(ctx.source(), &segments).cloned()
}
