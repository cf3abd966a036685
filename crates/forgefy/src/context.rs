use crate::registry::{default_registry, OperatorRegistry};
use serde_json::Value;

/// Execution context threaded through every resolution step.
///
/// `source` stays bound to the root payload for the whole projection run;
/// array transforms derive child contexts that bind `$current`, `$index`
/// and `$accumulated` without touching `source`. Contexts are copied when
/// derived, never mutated in place.
#[derive(Clone, Copy)]
pub struct ExecutionContext<'a> {
    source: &'a Value,
    registry: &'a OperatorRegistry,
    current: Option<&'a Value>,
    index: Option<usize>,
    accumulated: Option<&'a Value>,
}

impl<'a> ExecutionContext<'a> {
    /// Context over `source` using the process-wide default registry.
    pub fn new(source: &'a Value) -> Self {
        Self::with_registry(source, default_registry())
    }

    /// Context over `source` using a caller-built registry.
    pub fn with_registry(source: &'a Value, registry: &'a OperatorRegistry) -> Self {
        ExecutionContext {
            source,
            registry,
            current: None,
            index: None,
            accumulated: None,
        }
    }

    /// The root payload of the current resolution tree.
    pub fn source(&self) -> &'a Value {
        self.source
    }

    pub fn registry(&self) -> &'a OperatorRegistry {
        self.registry
    }

    /// The element under iteration, when bound by an array transform.
    pub fn current(&self) -> Option<&'a Value> {
        self.current
    }

    /// The position of the element under iteration, when bound.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The running accumulator of a reduce, when bound.
    pub fn accumulated(&self) -> Option<&'a Value> {
        self.accumulated
    }

    /// Derives a per-element context: binds `$current` and `$index`,
    /// keeping `source` and any accumulator binding.
    pub fn with_element(&self, current: &'a Value, index: usize) -> Self {
        ExecutionContext {
            current: Some(current),
            index: Some(index),
            ..*self
        }
    }

    /// Derives a context with `$accumulated` bound.
    pub fn with_accumulated(&self, accumulated: &'a Value) -> Self {
        ExecutionContext {
            accumulated: Some(accumulated),
            ..*self
        }
    }
}
