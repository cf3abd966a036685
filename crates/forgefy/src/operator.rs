use crate::context::ExecutionContext;
use crate::error::OperatorError;
use serde_json::Value;

/// The call shape every operator implements.
///
/// The context parameter is the "configure" stage of the operator
/// contract: it carries the root source, the registry for recursive
/// resolution, and any loop-scoped bindings.
pub type OperatorFn = fn(&Value, &ExecutionContext<'_>) -> Result<Value, OperatorError>;

/// A registered operator.
pub struct OperatorDefinition {
    /// Registry key, always `$`-prefixed.
    pub key: &'static str,
    /// The operator body. Receives resolved input unless `defer_input`.
    pub apply: OperatorFn,
    /// When true the engine skips argument resolution and passes the raw
    /// input: array transforms resolve their lambda per element under a
    /// derived scope, and `$exists` probes the source for key presence.
    pub defer_input: bool,
}
