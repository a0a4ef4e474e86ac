//! Interactions: actions that see both state and dependencies.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;

use portable_atomic_util::Arc;

use crate::{Action, Context, Eval, Getter, Injectable};

/// An interaction is resolved and called exactly like an action.
pub type Interaction<S, D, P, R> = Action<S, D, P, R>;

/// What an interaction's pure function sees.
pub struct Scope<SV, DV> {
    pub state: SV,
    pub dependencies: DV,
}

/// Definition of an interaction: `pure(scope, payload) -> result`.
///
/// Interactions do not write their own context. They reach other components
/// through their dependencies, which is how cross-component calls happen.
#[allow(clippy::type_complexity)]
pub struct InteractionDef<S, D, SV, DV, P, R> {
    state: Getter<S, SV>,
    dependencies: Getter<D, DV>,
    pure: Box<dyn Fn(Scope<SV, DV>, P) -> R>,
}

impl<S: 'static, D: 'static, P, R> InteractionDef<S, D, Arc<S>, Arc<D>, P, R> {
    pub fn new(pure: impl Fn(Scope<Arc<S>, Arc<D>>, P) -> R + 'static) -> Self {
        Self::lensed(Getter::identity(), Getter::identity(), pure)
    }
}

impl<S: 'static, D: 'static, SV, P, R> InteractionDef<S, D, SV, Arc<D>, P, R> {
    /// Narrow the state view only; dependencies are seen whole.
    pub fn state_lensed(
        state: Getter<S, SV>,
        pure: impl Fn(Scope<SV, Arc<D>>, P) -> R + 'static,
    ) -> Self {
        Self::lensed(state, Getter::identity(), pure)
    }
}

impl<S: 'static, D: 'static, DV, P, R> InteractionDef<S, D, Arc<S>, DV, P, R> {
    /// Narrow the dependencies view only; state is seen whole.
    pub fn dependencies_lensed(
        dependencies: Getter<D, DV>,
        pure: impl Fn(Scope<Arc<S>, DV>, P) -> R + 'static,
    ) -> Self {
        Self::lensed(Getter::identity(), dependencies, pure)
    }
}

impl<S, D, SV, DV, P, R> InteractionDef<S, D, SV, DV, P, R> {
    pub fn lensed(
        state: Getter<S, SV>,
        dependencies: Getter<D, DV>,
        pure: impl Fn(Scope<SV, DV>, P) -> R + 'static,
    ) -> Self {
        Self {
            state,
            dependencies,
            pure: Box::new(pure),
        }
    }
}

/// Build an [`Interaction`] from a definition.
pub fn create_interaction<S, D, SV, DV, P, R>(
    def: InteractionDef<S, D, SV, DV, P, R>,
) -> Interaction<S, D, P, R>
where
    S: 'static,
    D: 'static,
    SV: 'static,
    DV: 'static,
    P: 'static,
    R: 'static,
{
    let InteractionDef {
        state,
        dependencies,
        pure,
    } = def;
    let lenses = Arc::new((state, dependencies));
    let pure = Arc::new(pure);

    Action::new(move |payload: P| {
        let lenses = lenses.clone();
        let pure = pure.clone();
        Eval::Inject(Injectable::new(move |ctx: Context<S, D>| {
            let (state, dependencies) = &*lenses;
            let scope = Scope {
                state: state.get(&ctx.state),
                dependencies: dependencies.get(&ctx.dependencies),
            };
            (Eval::Value((**pure)(scope, payload)), ctx)
        }))
    })
}
