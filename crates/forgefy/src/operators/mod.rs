//! The built-in operator catalog, grouped by concern.

pub mod arithmetic;
pub mod array;
pub mod comparison;
pub mod conditional;
pub mod date;
pub mod logical;
pub mod string;
pub mod type_ops;

use crate::operator::OperatorDefinition;
use crate::registry::OperatorRegistry;

/// All built-in operators combined.
pub fn all_operators() -> Vec<OperatorDefinition> {
    let mut ops = Vec::new();
    ops.extend(arithmetic::operators());
    ops.extend(string::operators());
    ops.extend(comparison::operators());
    ops.extend(logical::operators());
    ops.extend(conditional::operators());
    ops.extend(date::operators());
    ops.extend(type_ops::operators());
    ops.extend(array::operators());
    ops
}

/// Builds a registry pre-populated with every built-in operator.
pub fn builtin_registry() -> OperatorRegistry {
    let mut registry = OperatorRegistry::new();
    for def in all_operators() {
        registry.register(def);
    }
    registry
}
