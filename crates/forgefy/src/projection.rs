//! Blueprint projection: forging a new object from a source.

use crate::context::ExecutionContext;
use crate::error::OperatorError;
use crate::registry::OperatorRegistry;
use crate::resolver::{self, classify, Expression};
use serde_json::{Map, Value};

/// Forges a fresh value from `source` by resolving every entry of
/// `blueprint`, using the default registry.
///
/// Output keys keep the blueprint's order. The source is never touched.
/// The root object is always walked key by key, even when it is itself
/// shaped like an operator call; operators resolve in value position only,
/// so `{"$toUpper": "$name"}` as a whole blueprint forges to
/// `{"$toUpper": "<name value>"}` rather than an uppercased string.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// let source = json!({
///     "user": {"first": "Ada", "last": "Lovelace"},
///     "visits": [3, 9, 4],
/// });
/// let blueprint = json!({
///     "name": {"$concat": ["$user.first", " ", "$user.last"]},
///     "peak": {"$max": "$visits"},
///     "plan": "$subscription.tier",
/// });
/// let forged = forgefy::forgefy(&source, &blueprint).unwrap();
/// assert_eq!(forged, json!({
///     "name": "Ada Lovelace",
///     "peak": 9,
///     "plan": null,
/// }));
/// ```
pub fn forgefy(source: &Value, blueprint: &Value) -> Result<Value, OperatorError> {
    forge_root(blueprint, &ExecutionContext::new(source))
}

/// Same as [`forgefy`], against a caller-built registry.
pub fn forgefy_with(
    source: &Value,
    blueprint: &Value,
    registry: &OperatorRegistry,
) -> Result<Value, OperatorError> {
    forge_root(blueprint, &ExecutionContext::with_registry(source, registry))
}

/// Entry point for the root blueprint: object roots are walked entry by
/// entry without classification, so a root that happens to be shaped like
/// a registered operator call still forges as a plain object. Non-object
/// roots resolve under ordinary expression rules.
fn forge_root(blueprint: &Value, ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    match blueprint {
        Value::Object(map) => forge_entries(map, ctx),
        other => resolver::resolve_in(other, ctx),
    }
}

/// Recursive projection step for values in blueprint position.
///
/// Differs from expression resolution in exactly one place: an
/// operator-shaped object whose key is not registered forges entry by
/// entry here (the `$`-key survives into the output), instead of
/// resolving to null.
pub(crate) fn forge(blueprint: &Value, ctx: &ExecutionContext<'_>) -> Result<Value, OperatorError> {
    let map = match blueprint {
        Value::Object(map) => map,
        other => return resolver::resolve_in(other, ctx),
    };
    if let Expression::OperatorCall { .. } = classify(blueprint, ctx.registry()) {
        return resolver::resolve_in(blueprint, ctx);
    }
    forge_entries(map, ctx)
}

fn forge_entries(
    map: &Map<String, Value>,
    ctx: &ExecutionContext<'_>,
) -> Result<Value, OperatorError> {
    let mut forged = Map::with_capacity(map.len());
    for (key, value) in map {
        forged.insert(key.clone(), forge(value, ctx)?);
    }
    Ok(Value::Object(forged))
}
