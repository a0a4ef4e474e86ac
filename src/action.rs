//! Action builders turning pure functions into context transitions.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;
#[cfg(feature = "no_std")]
use alloc::string::ToString;
#[cfg(feature = "no_std")]
use alloc::vec::Vec;

use core::fmt;
use core::str::FromStr;

use portable_atomic_util::Arc;

use crate::{Command, Context, Error, Eval, Getter, Injectable, Lens};

/// A callable producing an [`Eval`] from a payload.
///
/// Actions never touch a context themselves; they describe what to do with
/// one. A component resolves each action so that calling it runs the
/// described transition against the component's context.
pub struct Action<S, D, P, R>(Arc<Box<dyn Fn(P) -> Eval<S, D, R>>>);

impl<S, D, P, R> Clone for Action<S, D, P, R> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S, D, P, R> Action<S, D, P, R> {
    pub fn new(action: impl Fn(P) -> Eval<S, D, R> + 'static) -> Self {
        let action: Box<dyn Fn(P) -> Eval<S, D, R>> = Box::new(action);
        Self(Arc::new(action))
    }

    pub fn call(&self, payload: P) -> Eval<S, D, R> {
        (**self.0)(payload)
    }
}

/// The four kinds of action a definition can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Reads a lensed view and writes an updated one back.
    State,
    /// Reads a lensed view.
    Reader,
    /// Reads a lensed view and queues commands.
    Invoke,
    /// Folds a payload into the lensed view, reporting nothing.
    Reducer,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::State => "state",
            ActionKind::Reader => "reader",
            ActionKind::Invoke => "invoke",
            ActionKind::Reducer => "reducer",
        })
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "state" => Ok(ActionKind::State),
            "reader" => Ok(ActionKind::Reader),
            "invoke" => Ok(ActionKind::Invoke),
            "reducer" => Ok(ActionKind::Reducer),
            other => Err(Error::InvalidActionType(other.to_string())),
        }
    }
}

/// An action definition that [`create_action`] can build.
pub trait ActionDef<S, D> {
    type Payload;
    type Output;

    fn kind(&self) -> ActionKind;

    fn into_action(self) -> Action<S, D, Self::Payload, Self::Output>;
}

/// Build an [`Action`] from a definition.
///
/// # Example
///
/// ```rust
/// use statelet::{create_action, Action, Lens, StateAction};
///
/// struct Counter { count: i32 }
///
/// let inc: Action<Counter, (), (), ()> = create_action(StateAction::lensed(
///     Lens::new(|s: &Counter| s.count, |count, _: &Counter| Counter { count }),
///     |count: i32, _: ()| ((), count + 1),
/// ));
/// # let _ = inc;
/// ```
pub fn create_action<S, D, A: ActionDef<S, D>>(def: A) -> Action<S, D, A::Payload, A::Output> {
    tracing::trace!(kind = %def.kind(), "building action");
    def.into_action()
}

/// `state` action: `pure(view, payload) -> (result, updated_view)`.
#[allow(clippy::type_complexity)]
pub struct StateAction<S, V, P, R> {
    lens: Lens<S, V>,
    pure: Box<dyn Fn(V, P) -> (R, V)>,
}

impl<S: 'static, P, R> StateAction<S, Arc<S>, P, R> {
    pub fn new(pure: impl Fn(Arc<S>, P) -> (R, Arc<S>) + 'static) -> Self {
        Self::lensed(Lens::identity(), pure)
    }
}

impl<S, V, P, R> StateAction<S, V, P, R> {
    pub fn lensed(lens: Lens<S, V>, pure: impl Fn(V, P) -> (R, V) + 'static) -> Self {
        Self {
            lens,
            pure: Box::new(pure),
        }
    }
}

impl<S: 'static, D: 'static, V: 'static, P: 'static, R: 'static> ActionDef<S, D>
    for StateAction<S, V, P, R>
{
    type Payload = P;
    type Output = R;

    fn kind(&self) -> ActionKind {
        ActionKind::State
    }

    fn into_action(self) -> Action<S, D, P, R> {
        let lens = Arc::new(self.lens);
        let pure = Arc::new(self.pure);

        Action::new(move |payload: P| {
            let lens = lens.clone();
            let pure = pure.clone();
            Eval::Inject(Injectable::new(move |ctx: Context<S, D>| {
                let (result, updated) = (**pure)(lens.get(&ctx.state), payload);
                let state = lens.set(updated, &ctx.state);
                (Eval::Value(result), ctx.with_state(state))
            }))
        })
    }
}

/// `reader` action: `pure(view, payload) -> result`, leaving the context untouched.
#[allow(clippy::type_complexity)]
pub struct ReaderAction<S, V, P, R> {
    getter: Getter<S, V>,
    pure: Box<dyn Fn(V, P) -> R>,
}

impl<S: 'static, P, R> ReaderAction<S, Arc<S>, P, R> {
    pub fn new(pure: impl Fn(Arc<S>, P) -> R + 'static) -> Self {
        Self::lensed(Getter::identity(), pure)
    }
}

impl<S, V, P, R> ReaderAction<S, V, P, R> {
    pub fn lensed(getter: Getter<S, V>, pure: impl Fn(V, P) -> R + 'static) -> Self {
        Self {
            getter,
            pure: Box::new(pure),
        }
    }
}

impl<S: 'static, D: 'static, V: 'static, P: 'static, R: 'static> ActionDef<S, D>
    for ReaderAction<S, V, P, R>
{
    type Payload = P;
    type Output = R;

    fn kind(&self) -> ActionKind {
        ActionKind::Reader
    }

    fn into_action(self) -> Action<S, D, P, R> {
        let getter = Arc::new(self.getter);
        let pure = Arc::new(self.pure);

        Action::new(move |payload: P| {
            let getter = getter.clone();
            let pure = pure.clone();
            Eval::Inject(Injectable::new(move |ctx: Context<S, D>| {
                let result = (**pure)(getter.get(&ctx.state), payload);
                (Eval::Value(result), ctx)
            }))
        })
    }
}

/// `invoke` action: `pure(view, payload) -> (result, commands)`.
///
/// The commands are appended to the invoke queue and dispatched after the
/// run commits.
#[allow(clippy::type_complexity)]
pub struct InvokeAction<S, V, P, R> {
    getter: Getter<S, V>,
    pure: Box<dyn Fn(V, P) -> (R, Vec<Command>)>,
}

impl<S: 'static, P, R> InvokeAction<S, Arc<S>, P, R> {
    pub fn new(pure: impl Fn(Arc<S>, P) -> (R, Vec<Command>) + 'static) -> Self {
        Self::lensed(Getter::identity(), pure)
    }
}

impl<S, V, P, R> InvokeAction<S, V, P, R> {
    pub fn lensed(
        getter: Getter<S, V>,
        pure: impl Fn(V, P) -> (R, Vec<Command>) + 'static,
    ) -> Self {
        Self {
            getter,
            pure: Box::new(pure),
        }
    }
}

impl<S: 'static, D: 'static, V: 'static, P: 'static, R: 'static> ActionDef<S, D>
    for InvokeAction<S, V, P, R>
{
    type Payload = P;
    type Output = R;

    fn kind(&self) -> ActionKind {
        ActionKind::Invoke
    }

    fn into_action(self) -> Action<S, D, P, R> {
        let getter = Arc::new(self.getter);
        let pure = Arc::new(self.pure);

        Action::new(move |payload: P| {
            let getter = getter.clone();
            let pure = pure.clone();
            Eval::Inject(Injectable::new(move |ctx: Context<S, D>| {
                let (result, commands) = (**pure)(getter.get(&ctx.state), payload);
                (Eval::Value(result), ctx.with_commands(commands))
            }))
        })
    }
}

/// `reducer` action: `pure(view, action) -> updated_view`, always reporting `()`.
#[allow(clippy::type_complexity)]
pub struct ReducerAction<S, V, P> {
    lens: Lens<S, V>,
    pure: Box<dyn Fn(V, P) -> V>,
}

impl<S: 'static, P> ReducerAction<S, Arc<S>, P> {
    pub fn new(pure: impl Fn(Arc<S>, P) -> Arc<S> + 'static) -> Self {
        Self::lensed(Lens::identity(), pure)
    }
}

impl<S, V, P> ReducerAction<S, V, P> {
    pub fn lensed(lens: Lens<S, V>, pure: impl Fn(V, P) -> V + 'static) -> Self {
        Self {
            lens,
            pure: Box::new(pure),
        }
    }
}

impl<S: 'static, D: 'static, V: 'static, P: 'static> ActionDef<S, D> for ReducerAction<S, V, P> {
    type Payload = P;
    type Output = ();

    fn kind(&self) -> ActionKind {
        ActionKind::Reducer
    }

    fn into_action(self) -> Action<S, D, P, ()> {
        let lens = Arc::new(self.lens);
        let pure = Arc::new(self.pure);

        Action::new(move |action: P| {
            let lens = lens.clone();
            let pure = pure.clone();
            Eval::Inject(Injectable::new(move |ctx: Context<S, D>| {
                let updated = (**pure)(lens.get(&ctx.state), action);
                let state = lens.set(updated, &ctx.state);
                (Eval::Value(()), ctx.with_state(state))
            }))
        })
    }
}
