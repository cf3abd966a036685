use crate::operator::OperatorDefinition;
use crate::operators;
use std::collections::HashMap;
use std::sync::OnceLock;

/// The table mapping `$`-keys to operator implementations.
///
/// Re-registering a key replaces the previous definition (last wins),
/// which is also how consumers shadow a built-in.
pub struct OperatorRegistry {
    ops: HashMap<&'static str, OperatorDefinition>,
}

impl OperatorRegistry {
    /// An empty registry. Use [`crate::operators::builtin_registry`] for
    /// one pre-populated with the built-in catalog.
    pub fn new() -> Self {
        OperatorRegistry {
            ops: HashMap::new(),
        }
    }

    /// Registers an operator under its key. Chainable.
    pub fn register(&mut self, def: OperatorDefinition) -> &mut Self {
        self.ops.insert(def.key, def);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OperatorDefinition> {
        self.ops.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.ops.contains_key(key)
    }

    /// The registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ops.keys().copied()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: OnceLock<OperatorRegistry> = OnceLock::new();

/// The process-wide registry holding every built-in operator.
///
/// Built once on first access; the `OnceLock` is the synchronization
/// barrier guaranteeing registration completes before any resolution can
/// observe the table.
pub fn default_registry() -> &'static OperatorRegistry {
    DEFAULT_REGISTRY.get_or_init(operators::builtin_registry)
}
