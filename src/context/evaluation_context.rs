//! Evaluation context for template expressions

use crate::model::Value;
use crate::resolver::ParameterResolver;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Well-known name under which a host publishes its parameter resolver
///
/// A host that evaluates expressions outside the bridge sets this once per
/// configuration-processing session; the bridge only ever reads it, and a
/// thread-bound resolver always takes precedence over it.
pub const RESOLVER_VARIABLE: &str = "resolver";

/// Ambient state for one family of evaluations
///
/// Holds the variables reachable from `#name` references in template
/// expressions, plus the optionally published parameter resolver. Root
/// objects are not part of the context; they are passed per call so one
/// context can serve evaluations against different roots.
#[derive(Clone, Default)]
pub struct EvaluationContext {
    variables: HashMap<String, Value>,
    resolver: Option<Arc<dyn ParameterResolver>>,
}

impl EvaluationContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Look up a variable by name
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Publish a parameter resolver under [`RESOLVER_VARIABLE`]
    ///
    /// Used by hosts as the fallback source consulted when no resolver is
    /// bound to the evaluating thread.
    pub fn publish_resolver(&mut self, resolver: Arc<dyn ParameterResolver>) {
        self.resolver = Some(resolver);
    }

    /// The published resolver, if any
    pub fn resolver(&self) -> Option<Arc<dyn ParameterResolver>> {
        self.resolver.clone()
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("variables", &self.variables)
            .field("resolver_published", &self.resolver.is_some())
            .finish()
    }
}
