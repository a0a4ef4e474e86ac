//! Reactions: state transforms driven from outside the component.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;

use portable_atomic_util::Arc;

use crate::{Action, Context, Eval, Injectable, Lens};

/// A callable that only threads state; it never produces a result.
///
/// Reactions are what a component hands to its external subscriptions, so
/// that a change elsewhere can be folded into this component's state.
pub struct Reaction<S, D, P>(Action<S, D, P, ()>);

impl<S, D, P> Clone for Reaction<S, D, P> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S, D, P> Reaction<S, D, P> {
    /// A reaction from a raw step function.
    pub fn new(reaction: impl Fn(P) -> Eval<S, D, ()> + 'static) -> Self {
        Self(Action::new(reaction))
    }

    pub fn call(&self, payload: P) -> Eval<S, D, ()> {
        self.0.call(payload)
    }
}

/// Definition of a reaction: `pure(view, payload) -> updated_view`.
#[allow(clippy::type_complexity)]
pub struct ReactionDef<S, V, P> {
    lens: Lens<S, V>,
    pure: Box<dyn Fn(V, P) -> V>,
}

impl<S: 'static, P> ReactionDef<S, Arc<S>, P> {
    pub fn new(pure: impl Fn(Arc<S>, P) -> Arc<S> + 'static) -> Self {
        Self::lensed(Lens::identity(), pure)
    }
}

impl<S, V, P> ReactionDef<S, V, P> {
    pub fn lensed(lens: Lens<S, V>, pure: impl Fn(V, P) -> V + 'static) -> Self {
        Self {
            lens,
            pure: Box::new(pure),
        }
    }
}

/// Build a [`Reaction`] that writes `pure`'s output back through the lens.
pub fn create_reaction<S, D, V, P>(def: ReactionDef<S, V, P>) -> Reaction<S, D, P>
where
    S: 'static,
    D: 'static,
    V: 'static,
    P: 'static,
{
    let lens = Arc::new(def.lens);
    let pure = Arc::new(def.pure);

    Reaction::new(move |payload: P| {
        let lens = lens.clone();
        let pure = pure.clone();
        Eval::Inject(Injectable::new(move |ctx: Context<S, D>| {
            let updated = (**pure)(lens.get(&ctx.state), payload);
            let state = lens.set(updated, &ctx.state);
            (Eval::Value(()), ctx.with_state(state))
        }))
    })
}
