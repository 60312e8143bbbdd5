//! Per-thread resolver bindings
//!
//! Each execution context carries at most one parameter resolver. The
//! binding is thread-local so concurrent pipelines evaluating the same
//! expression never observe each other's resolver, and no locking is
//! needed. Bindings are scoped: [`bind_resolver`] returns a guard that
//! restores the previous binding when dropped, so a nested operation can
//! install its own resolver without disturbing its caller's.

use super::evaluation_context::EvaluationContext;
use crate::resolver::{NullParameterResolver, ParameterResolver};
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

/// Shared default resolver, handed out when no binding exists
static DEFAULT_RESOLVER: Lazy<Arc<dyn ParameterResolver>> =
    Lazy::new(|| Arc::new(NullParameterResolver));

thread_local! {
    static BOUND: RefCell<Option<Arc<dyn ParameterResolver>>> = const { RefCell::new(None) };
}

/// Bind a resolver to the calling thread for the lifetime of the guard
///
/// Replaces any existing binding; dropping the guard restores it. Other
/// threads are unaffected.
#[must_use = "dropping the guard immediately removes the binding"]
pub fn bind_resolver(resolver: Arc<dyn ParameterResolver>) -> ResolverBinding {
    let previous = BOUND.with(|slot| slot.replace(Some(resolver)));
    log::trace!("bound parameter resolver to current thread");
    ResolverBinding {
        previous,
        _not_send: PhantomData,
    }
}

/// The resolver bound to the calling thread
///
/// Falls back to the shared [`NullParameterResolver`] when nothing is
/// bound; never produces an absent resolver.
pub fn current_resolver() -> Arc<dyn ParameterResolver> {
    BOUND
        .with(|slot| slot.borrow().clone())
        .unwrap_or_else(|| DEFAULT_RESOLVER.clone())
}

/// Resolve the active resolver for one evaluation
///
/// The thread binding takes precedence over a resolver published on the
/// evaluation context: the binding is set deliberately by the immediately
/// enclosing operation, whereas the published resolver is set once at
/// session setup and may be stale.
pub(crate) fn current_or(ctx: Option<&EvaluationContext>) -> Arc<dyn ParameterResolver> {
    if let Some(bound) = BOUND.with(|slot| slot.borrow().clone()) {
        return bound;
    }
    if let Some(published) = ctx.and_then(EvaluationContext::resolver) {
        log::trace!("using resolver published on the evaluation context");
        return published;
    }
    DEFAULT_RESOLVER.clone()
}

/// Guard for a scoped resolver binding
///
/// Restores the previously bound resolver (or the unbound state) on drop.
/// Not `Send`: the binding belongs to the thread that created it.
pub struct ResolverBinding {
    previous: Option<Arc<dyn ParameterResolver>>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ResolverBinding {
    fn drop(&mut self) {
        let previous = self.previous.take();
        BOUND.with(|slot| *slot.borrow_mut() = previous);
    }
}

impl std::fmt::Debug for ResolverBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverBinding")
            .field("restores_previous", &self.previous.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::resolver::MapResolver;

    #[test]
    fn test_unbound_yields_default() {
        assert_eq!(current_resolver().resolve("anything"), None);
    }

    #[test]
    fn test_binding_restores_on_drop() {
        let outer: MapResolver = [("name", "outer")].into_iter().collect();
        let inner: MapResolver = [("name", "inner")].into_iter().collect();

        let _outer_guard = bind_resolver(Arc::new(outer));
        assert_eq!(
            current_resolver().resolve("name"),
            Some(Value::String("outer".to_string()))
        );

        {
            let _inner_guard = bind_resolver(Arc::new(inner));
            assert_eq!(
                current_resolver().resolve("name"),
                Some(Value::String("inner".to_string()))
            );
        }

        assert_eq!(
            current_resolver().resolve("name"),
            Some(Value::String("outer".to_string()))
        );
    }

    #[test]
    fn test_context_fallback_only_when_unbound() {
        let published: MapResolver = [("name", "published")].into_iter().collect();
        let mut ctx = EvaluationContext::new();
        ctx.publish_resolver(Arc::new(published));

        assert_eq!(
            current_or(Some(&ctx)).resolve("name"),
            Some(Value::String("published".to_string()))
        );

        let bound: MapResolver = [("name", "bound")].into_iter().collect();
        let _guard = bind_resolver(Arc::new(bound));
        assert_eq!(
            current_or(Some(&ctx)).resolve("name"),
            Some(Value::String("bound".to_string()))
        );
    }
}
