//! Dual-syntax configuration expression evaluation
//!
//! A configuration string may be written in either of two expression
//! languages: a compact parameter macro syntax (`cache-name`,
//! `near-{cache-name}`, `{timeout 30}`) or a general-purpose template
//! expression syntax (`1 + 1`, `#{#region}-zone`). The
//! [`DelegatingExpression`] evaluates the macro form first and falls back
//! to the template form exactly once when the macro form yields no result.
//!
//! Parameter values come from a [`ParameterResolver`] supplied implicitly:
//! the enclosing operation binds one to its thread with [`bind_resolver`],
//! and every evaluation on that thread picks it up. Concurrent pipelines
//! never observe each other's resolver. A host that evaluates expressions
//! through its own engine can instead publish a resolver on an
//! [`EvaluationContext`] under [`RESOLVER_VARIABLE`].
//!
//! ```
//! use paramexpr::{ExpressionBridge, MapResolver, Value, bind_resolver};
//! use std::sync::Arc;
//!
//! let bridge = ExpressionBridge::new();
//! let expr = bridge.parse("cache-name").unwrap();
//!
//! let resolver: MapResolver = [("cache-name", "orders")].into_iter().collect();
//! let _guard = bind_resolver(Arc::new(resolver));
//!
//! assert_eq!(expr.value().unwrap(), Value::from("orders"));
//!
//! // Not a macro reference: falls back to the template syntax
//! let expr = bridge.parse("1 + 1").unwrap();
//! assert_eq!(expr.value().unwrap(), Value::Integer(2));
//! ```

pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod macros;
pub mod model;
pub mod parser;
pub mod resolver;

// Re-export main types
pub use context::{
    EvaluationContext, RESOLVER_VARIABLE, ResolverBinding, bind_resolver, current_resolver,
};
pub use engine::{DelegatingExpression, ExpressionBridge};
pub use error::{ExprError, Result};
pub use model::{FromValue, Value};
pub use resolver::{MapResolver, NullParameterResolver, ParameterResolver};
