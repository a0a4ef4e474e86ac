//! Deferred commands and the name-keyed registry that dispatches them.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;
#[cfg(feature = "no_std")]
use alloc::collections::BTreeMap;
#[cfg(feature = "no_std")]
use alloc::string::{String, ToString};
#[cfg(not(feature = "no_std"))]
use std::collections::BTreeMap;

use core::any::{Any, TypeId};
use core::fmt;

use portable_atomic_util::Arc;

use crate::Error;

/// A type-erased, cheaply cloneable command payload.
#[derive(Clone)]
pub struct Payload(Arc<Box<dyn Any>>);

impl Payload {
    pub fn new<T: 'static>(value: T) -> Self {
        let value: Box<dyn Any> = Box::new(value);
        Self(Arc::new(value))
    }

    /// Borrow the payload as `T`, if that is what it holds.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        (**self.0).downcast_ref::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}

/// A command queued by an `invoke` action: a handler name plus its payload.
///
/// Commands sit in the context's invoke queue until the run that queued them
/// has committed, then each is dispatched through the component's
/// interactions.
#[derive(Clone, Debug)]
pub struct Command {
    kind: String,
    payload: Payload,
}

impl Command {
    /// Create a command for the handler registered as `kind`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statelet::Command;
    ///
    /// let command = Command::new("append", String::from(" changed"));
    /// assert_eq!(command.kind(), "append");
    /// assert_eq!(command.payload().downcast_ref::<String>().unwrap(), " changed");
    /// ```
    pub fn new<P: 'static>(kind: impl Into<String>, payload: P) -> Self {
        Self {
            kind: kind.into(),
            payload: Payload::new(payload),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// A type-erased callable registered under a name.
///
/// The handler remembers the payload and output types it was built with, so
/// a typed call can be rejected before anything runs.
#[derive(Clone)]
pub struct Handler {
    payload: TypeId,
    output: TypeId,
    #[allow(clippy::type_complexity)]
    handler: Arc<Box<dyn Fn(&Payload) -> Result<Box<dyn Any>, Error>>>,
}

impl Handler {
    /// Erase a typed callable.
    ///
    /// The handler clones its payload out of the [`Payload`] on every call and
    /// fails with [`Error::PayloadType`] (naming `name`) when the payload is
    /// not a `P`.
    pub fn new<P, R, F>(name: impl Into<String>, handler: F) -> Self
    where
        P: Clone + 'static,
        R: 'static,
        F: Fn(P) -> Result<R, Error> + 'static,
    {
        let name = name.into();
        let handler: Box<dyn Fn(&Payload) -> Result<Box<dyn Any>, Error>> =
            Box::new(move |payload: &Payload| {
                let payload = payload
                    .downcast_ref::<P>()
                    .cloned()
                    .ok_or_else(|| Error::PayloadType(name.clone()))?;
                handler(payload).map(|output| Box::new(output) as Box<dyn Any>)
            });
        Self {
            payload: TypeId::of::<P>(),
            output: TypeId::of::<R>(),
            handler: Arc::new(handler),
        }
    }

    pub fn accepts<P: 'static>(&self) -> bool {
        self.payload == TypeId::of::<P>()
    }

    pub fn produces<R: 'static>(&self) -> bool {
        self.output == TypeId::of::<R>()
    }

    pub fn handle(&self, payload: &Payload) -> Result<Box<dyn Any>, Error> {
        (**self.handler)(payload)
    }
}

/// Mapping from command type to handler.
///
/// A component keeps three of these: its interactions (used to drain the
/// invoke queue), its public actions merged with its interactions, and its
/// reactions handed to external subscriptions.
#[derive(Clone, Default)]
pub struct Invoker {
    handlers: BTreeMap<String, Handler>,
}

/// A component's public actions and interactions, by name.
pub type Actions = Invoker;

/// A component's resolved reactions, by name.
pub type Reactions = Invoker;

impl Invoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` as `kind`, replacing any previous handler of that name.
    pub fn add(mut self, kind: impl Into<String>, handler: Handler) -> Self {
        self.handlers.insert(kind.into(), handler);
        self
    }

    pub fn remove(mut self, kind: &str) -> Self {
        self.handlers.remove(kind);
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Look up `kind` and call its handler with `payload`.
    pub fn invoke(&self, kind: &str, payload: &Payload) -> Result<Box<dyn Any>, Error> {
        self.handler(kind)?.handle(payload)
    }

    /// Typed convenience over [`invoke`](Self::invoke).
    ///
    /// Fails with [`Error::PayloadType`] or [`Error::OutputType`] without
    /// calling the handler if it was not registered for `P` and `R`.
    pub fn call<P: 'static, R: 'static>(&self, kind: &str, payload: P) -> Result<R, Error> {
        let handler = self.handler(kind)?;
        if !handler.accepts::<P>() {
            return Err(Error::PayloadType(kind.to_string()));
        }
        if !handler.produces::<R>() {
            return Err(Error::OutputType(kind.to_string()));
        }

        let output = handler.handle(&Payload::new(payload))?;
        output
            .downcast::<R>()
            .map(|output| *output)
            .map_err(|_| Error::OutputType(kind.to_string()))
    }

    fn handler(&self, kind: &str) -> Result<&Handler, Error> {
        self.handlers
            .get(kind)
            .ok_or_else(|| Error::UnknownCommand(kind.to_string()))
    }
}
