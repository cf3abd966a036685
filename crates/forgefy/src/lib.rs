//! Declarative JSON shaping.
//!
//! # Overview
//!
//! A blueprint is a JSON value describing the output you want: plain
//! literals stand, `$`-prefixed dotted strings pull values out of the
//! source payload, and single-key `{"$operator": input}` objects compute.
//! Operators nest arbitrarily and resolve their inputs recursively, so a
//! blueprint reads as one declarative expression tree.
//!
//! # Example
//!
//! ```
//! use forgefy::forgefy;
//! use serde_json::json;
//!
//! let source = json!({
//!     "user": {"first": "Ada", "last": "Lovelace"},
//!     "visits": [3, 9, 4],
//! });
//! let blueprint = json!({
//!     "name": {"$concat": ["$user.first", " ", "$user.last"]},
//!     "peak": {"$max": "$visits"},
//!     "plan": "$subscription.tier",
//! });
//!
//! let forged = forgefy(&source, &blueprint).unwrap();
//! assert_eq!(forged, json!({
//!     "name": "Ada Lovelace",
//!     "peak": 9,
//!     "plan": null,
//! }));
//! ```
//!
//! Custom operators register through [`OperatorRegistry`] and run via
//! [`forgefy_with`], exactly the way the built-ins are wired.

pub mod context;
pub mod error;
pub mod fallback;
pub mod operator;
pub mod operators;
pub mod projection;
pub mod registry;
pub mod resolver;
pub mod util;

// Re-export the core public API
pub use context::ExecutionContext;
pub use error::OperatorError;
pub use operator::{OperatorDefinition, OperatorFn};
pub use operators::{all_operators, builtin_registry};
pub use projection::{forgefy, forgefy_with};
pub use registry::{default_registry, OperatorRegistry};
pub use resolver::{
    classify, resolve_args, resolve_expression, resolve_expression_with, resolve_in, Expression,
};
