//! Component context: four pointers behind one atomic run operation.

#[cfg(feature = "no_std")]
use alloc::collections::BTreeMap;
#[cfg(feature = "no_std")]
use alloc::string::String;
#[cfg(feature = "no_std")]
use alloc::vec::Vec;
#[cfg(not(feature = "no_std"))]
use std::collections::BTreeMap;

use portable_atomic_util::Arc;

use crate::{Broadcast, Command, Consumer, Error, Pointer, State, Subscription};

/// External subscriptions of a component, by declared name.
pub type Subscriptions = BTreeMap<String, Subscription>;

/// Snapshot of a component's context handed to every state transition.
///
/// Each field is shared, so a snapshot is cheap to build and a transition
/// that leaves a field alone hands back the same `Arc`.
pub struct Context<S, D> {
    pub state: Arc<S>,
    pub dependencies: Arc<D>,
    pub subscriptions: Arc<Subscriptions>,
    pub invoke: Arc<Vec<Command>>,
}

impl<S, D> Clone for Context<S, D> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            dependencies: self.dependencies.clone(),
            subscriptions: self.subscriptions.clone(),
            invoke: self.invoke.clone(),
        }
    }
}

impl<S, D> Context<S, D> {
    /// The same context with `state` in place of the current state.
    pub fn with_state(self, state: Arc<S>) -> Self {
        Self { state, ..self }
    }

    /// The same context with `commands` appended to the invoke queue.
    ///
    /// Appending nothing keeps the existing queue.
    pub fn with_commands(self, commands: impl IntoIterator<Item = Command>) -> Self {
        let mut commands = commands.into_iter().peekable();
        if commands.peek().is_none() {
            return self;
        }

        let queue = self.invoke.iter().cloned().chain(commands).collect::<Vec<_>>();
        Self {
            invoke: Arc::new(queue),
            ..self
        }
    }
}

/// Owner of the pointers that make up a component's context.
///
/// `run` assembles a fresh [`Context`] on every call, applies one transition
/// to it and commits back every field the transition replaced. A state
/// change observed during the commit raises the `pending` flag, and the component broadcast (if any)
/// fires once per run in which the flag was raised.
pub(crate) struct ContextCell<S, D> {
    state: State<S>,
    dependencies: Pointer<Option<Arc<D>>>,
    subscriptions: Pointer<Option<Arc<Subscriptions>>>,
    invoke: Pointer<Option<Arc<Vec<Command>>>>,
    pending: Pointer<bool>,
    broadcast: Option<Broadcast<Arc<S>>>,
}

impl<S: 'static, D> ContextCell<S, D> {
    pub(crate) fn new(state: S, dependencies: D, broadcast: Option<Broadcast<Arc<S>>>) -> Self {
        let state = State::new(state);
        let pending = Pointer::new(false);

        let flag = pending.clone();
        state.subscribe(Consumer::new(move |_: &Arc<S>| flag.set(true)));

        Self {
            state,
            dependencies: Pointer::new(Some(Arc::new(dependencies))),
            subscriptions: Pointer::new(Some(Arc::new(Subscriptions::new()))),
            invoke: Pointer::new(Some(Arc::new(Vec::new()))),
            pending,
            broadcast,
        }
    }
}

impl<S, D> ContextCell<S, D> {
    /// Apply `transition` to a fresh snapshot and commit the updated context.
    pub(crate) fn run<R>(
        &self,
        transition: impl FnOnce(Context<S, D>) -> (R, Context<S, D>),
    ) -> Result<R, Error> {
        let snapshot = self.snapshot()?;
        let (result, updated) = transition(snapshot.clone());
        self.commit(&snapshot, updated)?;
        self.flush()?;
        Ok(result)
    }

    pub(crate) fn state(&self) -> Result<Arc<S>, Error> {
        self.state.get()
    }

    /// Install the external subscriptions declared at construction.
    pub(crate) fn adopt(&self, subscriptions: Subscriptions) {
        self.subscriptions.set(Some(Arc::new(subscriptions)));
    }

    /// Take every queued command, leaving the queue empty.
    pub(crate) fn take_commands(&self) -> Result<Vec<Command>, Error> {
        self.invoke.apply(|queue| match queue {
            None => (Err(Error::Disposed), None),
            Some(queue) if queue.is_empty() => (Ok(Vec::new()), Some(queue)),
            Some(queue) => (Ok((*queue).clone()), Some(Arc::new(Vec::new()))),
        })
    }

    /// Tear the context down, returning the subscriptions that still need
    /// to be unsubscribed.
    pub(crate) fn dispose(&self) -> Option<Arc<Subscriptions>> {
        self.state.dispose();
        self.invoke.set(None);
        if let Some(broadcast) = &self.broadcast {
            broadcast.dispose();
        }

        let subscriptions = self.subscriptions.get();
        self.dependencies.set(None);
        self.subscriptions.set(None);
        subscriptions
    }

    fn snapshot(&self) -> Result<Context<S, D>, Error> {
        Ok(Context {
            state: self.state.get()?,
            dependencies: self.dependencies.get().ok_or(Error::Disposed)?,
            subscriptions: self.subscriptions.get().ok_or(Error::Disposed)?,
            invoke: self.invoke.get().ok_or(Error::Disposed)?,
        })
    }

    /// Write back only the fields the transition changed, so that runs
    /// nested inside this one keep the fields they committed.
    fn commit(&self, snapshot: &Context<S, D>, updated: Context<S, D>) -> Result<(), Error> {
        // A context disposed mid-transition stays disposed.
        if self.state.is_disposed() {
            return Err(Error::Disposed);
        }

        if !Arc::ptr_eq(&updated.state, &snapshot.state) {
            self.state.replace(updated.state)?;
        }
        if !Arc::ptr_eq(&updated.dependencies, &snapshot.dependencies) {
            self.dependencies.set(Some(updated.dependencies));
        }
        if !Arc::ptr_eq(&updated.subscriptions, &snapshot.subscriptions) {
            self.subscriptions.set(Some(updated.subscriptions));
        }
        if !Arc::ptr_eq(&updated.invoke, &snapshot.invoke) {
            self.invoke.set(Some(updated.invoke));
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        if self.pending.get() {
            if let Some(broadcast) = &self.broadcast {
                tracing::trace!("state changed, notifying observers");
                broadcast.notify(&self.state.get()?);
            }
            self.pending.set(false);
        }
        Ok(())
    }
}
