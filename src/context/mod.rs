//! Execution-context state: resolver bindings and evaluation contexts

mod evaluation_context;
mod registry;

pub use evaluation_context::{EvaluationContext, RESOLVER_VARIABLE};
pub use registry::{ResolverBinding, bind_resolver, current_resolver};

pub(crate) use registry::current_or;
