//! Deferred, context-dependent computations.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;

use crate::{Action, Binder, Context, Resolved};

/// The outcome of one evaluation step.
///
/// Actions return an `Eval`; the resolver keeps applying `Inject` steps to
/// the latest context until it reaches `Value` or `Bind`.
pub enum Eval<S, D, R> {
    /// Terminal data.
    Value(R),
    /// More work that needs the current context.
    Inject(Injectable<S, D, R>),
    /// Terminal data built from a handle to the owning component, used to
    /// hand back another action bound to the same component.
    #[allow(clippy::type_complexity)]
    Bind(Box<dyn FnOnce(&Binder<S, D>) -> R>),
}

impl<S, D, R> Eval<S, D, R> {
    pub fn inject(
        injectable: impl FnOnce(Context<S, D>) -> (Eval<S, D, R>, Context<S, D>) + 'static,
    ) -> Self {
        Eval::Inject(Injectable::new(injectable))
    }

    pub fn bind(bind: impl FnOnce(&Binder<S, D>) -> R + 'static) -> Self {
        Eval::Bind(Box::new(bind))
    }
}

impl<S: 'static, D: 'static, P: 'static, R: 'static> Eval<S, D, Resolved<S, D, P, R>> {
    /// Return `action` resolved against the component being evaluated,
    /// without invoking it.
    pub fn resolve(action: Action<S, D, P, R>) -> Self {
        Eval::bind(move |binder: &Binder<S, D>| binder.resolve(action))
    }
}

impl<S, D, R> From<Injectable<S, D, R>> for Eval<S, D, R> {
    fn from(injectable: Injectable<S, D, R>) -> Self {
        Eval::Inject(injectable)
    }
}

/// A transition over a [`Context`] whose result may itself require more work.
///
/// Injectables are transient: built for one invocation and consumed by the
/// resolver.
#[allow(clippy::type_complexity)]
pub struct Injectable<S, D, R>(Box<dyn FnOnce(Context<S, D>) -> (Eval<S, D, R>, Context<S, D>)>);

impl<S, D, R> Injectable<S, D, R> {
    pub fn new(
        injectable: impl FnOnce(Context<S, D>) -> (Eval<S, D, R>, Context<S, D>) + 'static,
    ) -> Self {
        Self(Box::new(injectable))
    }

    /// Apply this computation to `context`.
    pub fn inject(self, context: Context<S, D>) -> (Eval<S, D, R>, Context<S, D>) {
        (self.0)(context)
    }
}

/// Create an [`Injectable`] from a context transition.
///
/// # Example
///
/// ```rust
/// use statelet::{create_injectable, Arc, Context, Eval};
///
/// # #[derive(Clone)]
/// # struct Counter { count: i32 }
/// let increment = create_injectable(|ctx: Context<Counter, ()>| {
///     let next = Arc::new(Counter { count: ctx.state.count + 1 });
///     (Eval::Value(()), ctx.with_state(next))
/// });
/// # let _ = increment;
/// ```
pub fn create_injectable<S, D, R>(
    injectable: impl FnOnce(Context<S, D>) -> (Eval<S, D, R>, Context<S, D>) + 'static,
) -> Injectable<S, D, R> {
    Injectable::new(injectable)
}
