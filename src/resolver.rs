//! Parameter resolvers
//!
//! A resolver maps named configuration parameters to values for one
//! evaluation. Hosts supply a resolver per processing context; expressions
//! consult it through the context registry rather than receiving it as an
//! argument.

use crate::model::Value;
use std::collections::HashMap;

/// Capability that maps parameter names to values
///
/// Implementations must be cheap to call: resolution happens on every
/// evaluation of every parameter macro. A miss is an ordinary outcome, not
/// an error, so the return type carries no error channel.
pub trait ParameterResolver: Send + Sync {
    /// Resolve a parameter by name, or `None` if it is not known
    fn resolve(&self, name: &str) -> Option<Value>;
}

/// Resolver that knows no parameters
///
/// Serves as the shared default when no resolver is bound to the calling
/// context, so lookup never produces an absent resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullParameterResolver;

impl ParameterResolver for NullParameterResolver {
    fn resolve(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Table-backed resolver
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    parameters: HashMap<String, Value>,
}

impl MapResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a parameter
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.parameters.insert(name.into(), value.into());
    }

    /// Number of known parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check whether the resolver knows any parameters
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl ParameterResolver for MapResolver {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.parameters.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapResolver {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            parameters: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
