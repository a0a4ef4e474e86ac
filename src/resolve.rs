//! The resolver: a trampoline that drives [`Eval`] steps against a live context.

use portable_atomic_util::Weak;

use crate::runtime::Runtime;
use crate::{Action, Context, Error, Eval, Reaction};

/// A handle to the component an evaluation is running against.
///
/// Passed to [`Eval::Bind`] steps so they can resolve further actions against
/// the same component.
pub struct Binder<S, D> {
    runtime: Weak<Runtime<S, D>>,
}

impl<S: 'static, D: 'static> Binder<S, D> {
    pub(crate) fn new(runtime: Weak<Runtime<S, D>>) -> Self {
        Self { runtime }
    }

    pub fn resolve<P: 'static, R: 'static>(
        &self,
        action: Action<S, D, P, R>,
    ) -> Resolved<S, D, P, R> {
        resolve_action(&self.runtime, action)
    }

    pub fn resolve_reaction<P: 'static>(
        &self,
        reaction: Reaction<S, D, P>,
    ) -> ResolvedReaction<S, D, P> {
        resolve_reaction(&self.runtime, reaction)
    }
}

/// An action bound to a component.
///
/// Each call evaluates the action against the component's context and
/// commits the final context in a single run. Fails with
/// [`Error::Disposed`] once the component is disposed or dropped.
pub struct Resolved<S, D, P, R> {
    runtime: Weak<Runtime<S, D>>,
    action: Action<S, D, P, R>,
}

impl<S, D, P, R> Clone for Resolved<S, D, P, R> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            action: self.action.clone(),
        }
    }
}

impl<S: 'static, D: 'static, P: 'static, R: 'static> Resolved<S, D, P, R> {
    pub fn call(&self, payload: P) -> Result<R, Error> {
        let runtime = self.runtime.upgrade().ok_or(Error::Disposed)?;
        let step = self.action.call(payload);
        let binder = Binder::new(self.runtime.clone());
        runtime.run(move |current| evaluate(&binder, step, current))
    }
}

/// A reaction bound to a component. Calls only thread state; they report `()`.
pub struct ResolvedReaction<S, D, P> {
    runtime: Weak<Runtime<S, D>>,
    reaction: Reaction<S, D, P>,
}

impl<S, D, P> Clone for ResolvedReaction<S, D, P> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            reaction: self.reaction.clone(),
        }
    }
}

impl<S: 'static, D: 'static, P: 'static> ResolvedReaction<S, D, P> {
    pub fn call(&self, payload: P) -> Result<(), Error> {
        let runtime = self.runtime.upgrade().ok_or(Error::Disposed)?;
        let step = self.reaction.call(payload);
        runtime.run(move |current| ((), settle(step, current)))
    }
}

pub(crate) fn resolve_action<S, D, P, R>(
    runtime: &Weak<Runtime<S, D>>,
    action: Action<S, D, P, R>,
) -> Resolved<S, D, P, R> {
    Resolved {
        runtime: runtime.clone(),
        action,
    }
}

pub(crate) fn resolve_reaction<S, D, P>(
    runtime: &Weak<Runtime<S, D>>,
    reaction: Reaction<S, D, P>,
) -> ResolvedReaction<S, D, P> {
    ResolvedReaction {
        runtime: runtime.clone(),
        reaction,
    }
}

/// Drive `step` to a terminal value, threading the latest context through
/// every injectable. Runs in constant stack space regardless of nesting depth.
fn evaluate<S, D, R>(
    binder: &Binder<S, D>,
    mut step: Eval<S, D, R>,
    mut current: Context<S, D>,
) -> (R, Context<S, D>) {
    loop {
        step = match step {
            Eval::Value(result) => return (result, current),
            Eval::Bind(bind) => return (bind(binder), current),
            Eval::Inject(injectable) => {
                let (next, updated) = injectable.inject(current);
                current = updated;
                next
            }
        };
    }
}

/// Like [`evaluate`], discarding the terminal value.
fn settle<S, D>(mut step: Eval<S, D, ()>, mut current: Context<S, D>) -> Context<S, D> {
    loop {
        step = match step {
            Eval::Value(()) | Eval::Bind(_) => return current,
            Eval::Inject(injectable) => {
                let (next, updated) = injectable.inject(current);
                current = updated;
                next
            }
        };
    }
}
