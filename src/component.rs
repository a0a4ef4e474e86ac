//! The composition root wiring actions, interactions and reactions to one context.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;
#[cfg(feature = "no_std")]
use alloc::collections::BTreeMap;
#[cfg(feature = "no_std")]
use alloc::string::String;
#[cfg(not(feature = "no_std"))]
use std::collections::BTreeMap;

use portable_atomic_util::{Arc, Weak};

use crate::context::{ContextCell, Subscriptions};
use crate::resolve::{resolve_action, resolve_reaction};
use crate::runtime::Runtime;
use crate::{
    Action, Actions, Broadcast, Consumer, Error, Handler, Interaction, Invoker, Reaction,
    Reactions, Subscription,
};

type Register<S, D> = Box<dyn FnOnce(&Weak<Runtime<S, D>>) -> Handler>;
type Subscribe = Box<dyn FnOnce(&Reactions) -> Subscription>;

/// What a component's view receives on [`Component::render`].
pub struct Props<S> {
    pub state: Arc<S>,
    /// Actions merged with interactions.
    pub actions: Actions,
}

/// Static description of a component: its callables, observability and view.
///
/// Registered names must be unique per kind. An interaction shadows an
/// action of the same name in the merged [`Actions`].
pub struct Config<S, D, V = Props<S>> {
    actions: BTreeMap<String, Register<S, D>>,
    interactions: BTreeMap<String, Register<S, D>>,
    reactions: BTreeMap<String, Register<S, D>>,
    observable: bool,
    view: Box<dyn Fn(Props<S>) -> V>,
}

impl<S: 'static, D: 'static> Default for Config<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, D: 'static> Config<S, D> {
    pub fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
            interactions: BTreeMap::new(),
            reactions: BTreeMap::new(),
            observable: false,
            view: Box::new(|props: Props<S>| props),
        }
    }
}

impl<S: 'static, D: 'static, V: 'static> Config<S, D, V> {
    pub fn action<P, R>(mut self, name: impl Into<String>, action: Action<S, D, P, R>) -> Self
    where
        P: Clone + 'static,
        R: 'static,
    {
        let name = name.into();
        self.actions.insert(name.clone(), register_action(name, action));
        self
    }

    pub fn interaction<P, R>(
        mut self,
        name: impl Into<String>,
        interaction: Interaction<S, D, P, R>,
    ) -> Self
    where
        P: Clone + 'static,
        R: 'static,
    {
        let name = name.into();
        self.interactions
            .insert(name.clone(), register_action(name, interaction));
        self
    }

    pub fn reaction<P>(mut self, name: impl Into<String>, reaction: Reaction<S, D, P>) -> Self
    where
        P: Clone + 'static,
    {
        let name = name.into();
        let register: Register<S, D> = Box::new({
            let name = name.clone();
            move |runtime: &Weak<Runtime<S, D>>| {
                let resolved = resolve_reaction(runtime, reaction);
                Handler::new(name, move |payload: P| resolved.call(payload))
            }
        });
        self.reactions.insert(name, register);
        self
    }

    /// Expose `subscribe`/`unsubscribe` on the component.
    pub fn observable(mut self) -> Self {
        self.observable = true;
        self
    }

    /// Replace the view applied by [`Component::render`].
    pub fn view<W: 'static>(self, view: impl Fn(Props<S>) -> W + 'static) -> Config<S, D, W> {
        Config {
            actions: self.actions,
            interactions: self.interactions,
            reactions: self.reactions,
            observable: self.observable,
            view: Box::new(view),
        }
    }
}

fn register_action<S, D, P, R>(name: String, action: Action<S, D, P, R>) -> Register<S, D>
where
    S: 'static,
    D: 'static,
    P: Clone + 'static,
    R: 'static,
{
    Box::new(move |runtime: &Weak<Runtime<S, D>>| {
        let resolved = resolve_action(runtime, action);
        Handler::new(name, move |payload: P| resolved.call(payload))
    })
}

/// Initial values of a component: state, dependencies and external subscriptions.
pub struct Init<S, D = ()> {
    state: S,
    dependencies: D,
    subscribe: BTreeMap<String, Subscribe>,
}

impl<S> Init<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            dependencies: (),
            subscribe: BTreeMap::new(),
        }
    }
}

impl<S: Default, D: Default> Default for Init<S, D> {
    fn default() -> Self {
        Self {
            state: S::default(),
            dependencies: D::default(),
            subscribe: BTreeMap::new(),
        }
    }
}

impl<S, D> Init<S, D> {
    pub fn dependencies<E>(self, dependencies: E) -> Init<S, E> {
        Init {
            state: self.state,
            dependencies,
            subscribe: self.subscribe,
        }
    }

    /// Declare an external subscription.
    ///
    /// `subscriber` is called once while the component is built, with the
    /// component's resolved reactions, and returns the subscription to cancel
    /// on dispose.
    pub fn subscribe(
        mut self,
        name: impl Into<String>,
        subscriber: impl FnOnce(&Reactions) -> Subscription + 'static,
    ) -> Self {
        self.subscribe.insert(name.into(), Box::new(subscriber));
        self
    }
}

/// A stateful unit built from a [`Config`] and an [`Init`].
///
/// Cloning a component yields another handle to the same component. When the
/// last handle is dropped the component is disposed.
pub struct Component<S, D = (), V = Props<S>> {
    runtime: Arc<Runtime<S, D>>,
    actions: Arc<Actions>,
    view: Arc<Box<dyn Fn(Props<S>) -> V>>,
    broadcast: Option<Broadcast<Arc<S>>>,
}

impl<S, D, V> Clone for Component<S, D, V> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            actions: self.actions.clone(),
            view: self.view.clone(),
            broadcast: self.broadcast.clone(),
        }
    }
}

impl<S: 'static, D: 'static, V: 'static> Component<S, D, V> {
    pub fn new(config: Config<S, D, V>, init: Init<S, D>) -> Self {
        let Config {
            actions,
            interactions,
            reactions,
            observable,
            view,
        } = config;

        let broadcast = if observable {
            Some(Broadcast::new())
        } else {
            None
        };
        let cell = ContextCell::new(init.state, init.dependencies, broadcast.clone());
        let runtime = Arc::new(Runtime::new(cell));
        let handle = Arc::downgrade(&runtime);

        let mut merged = Actions::new();
        for (name, register) in actions {
            merged = merged.add(name, register(&handle));
        }

        let mut invoker = Invoker::new();
        for (name, register) in interactions {
            let handler = register(&handle);
            merged = merged.add(name.clone(), handler.clone());
            invoker = invoker.add(name, handler);
        }

        let mut resolved = Reactions::new();
        for (name, register) in reactions {
            resolved = resolved.add(name, register(&handle));
        }

        tracing::debug!(
            actions = merged.len(),
            interactions = invoker.len(),
            reactions = resolved.len(),
            observable,
            "component created"
        );

        runtime.install(invoker);

        let subscriptions = init
            .subscribe
            .into_iter()
            .map(|(name, subscribe)| (name, subscribe(&resolved)))
            .collect::<Subscriptions>();
        // A subscriber may dispose the component while it is being built.
        if let Err(error) = runtime.adopt(subscriptions) {
            tracing::debug!(%error, "component disposed during construction");
        }

        Self {
            runtime,
            actions: Arc::new(merged),
            view: Arc::new(view),
            broadcast,
        }
    }

    /// Call the action or interaction registered as `name`.
    pub fn call<P: 'static, R: 'static>(&self, name: &str, payload: P) -> Result<R, Error> {
        self.actions.call(name, payload)
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Apply the view to the current state and the merged actions.
    pub fn render(&self) -> Result<V, Error> {
        let state = self.runtime.state()?;
        let props = Props {
            state,
            actions: Actions::clone(&self.actions),
        };
        Ok((**self.view)(props))
    }

    pub fn is_observable(&self) -> bool {
        self.broadcast.is_some()
    }

    /// Subscribe to state changes. `None` unless the component is observable.
    pub fn subscribe(&self, consumer: Consumer<Arc<S>>) -> Option<Subscription> {
        self.broadcast
            .as_ref()
            .map(|broadcast| broadcast.subscribe(consumer))
    }

    pub fn unsubscribe(&self, consumer: &Consumer<Arc<S>>) {
        if let Some(broadcast) = &self.broadcast {
            broadcast.unsubscribe(consumer);
        }
    }

    /// Tear the component down.
    ///
    /// Clears state and the invoke queue, drops observers, unsubscribes every
    /// external subscription and severs dependencies. Every later call fails
    /// with [`Error::Disposed`].
    pub fn dispose(&self) {
        self.runtime.dispose();
    }
}

/// Build a [`Component`] from a configuration and its initial values.
///
/// # Example
///
/// ```rust
/// use statelet::{create_action, create_component, Config, Init, Lens, ReaderAction, StateAction, Getter};
///
/// #[derive(Clone)]
/// struct Counter { count: i32 }
///
/// let count = || Lens::new(|s: &Counter| s.count, |count, _: &Counter| Counter { count });
///
/// let component = create_component(
///     Config::new()
///         .action("inc", create_action(StateAction::lensed(count(), |c: i32, _: ()| ((), c + 1))))
///         .action("getCount", create_action(ReaderAction::lensed(
///             Getter::new(|s: &Counter| s.count),
///             |c: i32, _: ()| c,
///         ))),
///     Init::new(Counter { count: 0 }),
/// );
///
/// component.call::<(), ()>("inc", ()).unwrap();
/// assert_eq!(component.call::<(), i32>("getCount", ()), Ok(1));
/// ```
pub fn create_component<S: 'static, D: 'static, V: 'static>(
    config: Config<S, D, V>,
    init: Init<S, D>,
) -> Component<S, D, V> {
    Component::new(config, init)
}
