//! Subscriber registry with notify/dispose.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;
#[cfg(feature = "no_std")]
use alloc::vec::Vec;

use portable_atomic_util::Arc;

use crate::Pointer;

/// A subscriber callback with a stable identity.
///
/// Closures cannot be compared, so a `Consumer` is the handle the registry
/// compares: clones of one `Consumer` are the same subscriber, two
/// `Consumer::new` calls are different subscribers even for identical bodies.
pub struct Consumer<T>(Arc<Box<dyn Fn(&T)>>);

impl<T> Clone for Consumer<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Consumer<T> {
    pub fn new(consumer: impl Fn(&T) + 'static) -> Self {
        let consumer: Box<dyn Fn(&T)> = Box::new(consumer);
        Self(Arc::new(consumer))
    }

    /// Deliver `value` to this consumer.
    pub fn call(&self, value: &T) {
        (**self.0)(value)
    }

    /// Whether `other` is a handle to the same subscriber.
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// An unsubscribe thunk returned from every `subscribe` call.
///
/// Unsubscribing is idempotent. Dropping a `Subscription` does **not**
/// unsubscribe.
pub struct Subscription(Box<dyn Fn()>);

impl Subscription {
    pub fn new(unsubscribe: impl Fn() + 'static) -> Self {
        Self(Box::new(unsubscribe))
    }

    /// Remove the subscriber this subscription was created for.
    pub fn unsubscribe(&self) {
        (self.0)()
    }
}

/// Ordered set of consumers notified synchronously in subscription order.
///
/// The subscriber list lives in a [`Pointer`], so notification iterates a
/// snapshot and consumers may subscribe or unsubscribe while being notified.
pub struct Broadcast<T> {
    consumers: Pointer<Arc<Vec<Consumer<T>>>>,
}

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self {
        Self {
            consumers: self.consumers.clone(),
        }
    }
}

impl<T> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Broadcast<T> {
    pub fn new() -> Self {
        Self {
            consumers: Pointer::new(Arc::new(Vec::new())),
        }
    }

    /// Remove `consumer`. Removing a consumer that is not subscribed is a no-op.
    pub fn unsubscribe(&self, consumer: &Consumer<T>) {
        remove(&self.consumers, consumer)
    }

    /// Apply every current subscriber to `value`, in subscription order.
    pub fn notify(&self, value: &T) {
        let consumers = self.consumers.get();
        for consumer in consumers.iter() {
            consumer.call(value);
        }
    }

    /// Clear every subscriber without calling them.
    pub fn dispose(&self) {
        self.consumers.set(Arc::new(Vec::new()))
    }

    pub fn len(&self) -> usize {
        self.consumers.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Broadcast<T> {
    /// Register `consumer` and return its unsubscribe thunk.
    ///
    /// Subscribing an already-subscribed consumer keeps the single existing
    /// registration.
    pub fn subscribe(&self, consumer: Consumer<T>) -> Subscription {
        let registered = consumer.clone();
        self.consumers.apply(move |consumers| {
            if consumers.iter().any(|c| c.is_same(&registered)) {
                ((), consumers)
            } else {
                let mut next = (*consumers).clone();
                next.push(registered);
                ((), Arc::new(next))
            }
        });

        let consumers = self.consumers.clone();
        Subscription::new(move || remove(&consumers, &consumer))
    }
}

fn remove<T>(consumers: &Pointer<Arc<Vec<Consumer<T>>>>, consumer: &Consumer<T>) {
    consumers.apply(|current| {
        if current.iter().any(|c| c.is_same(consumer)) {
            let next = current
                .iter()
                .filter(|c| !c.is_same(consumer))
                .cloned()
                .collect::<Vec<_>>();
            ((), Arc::new(next))
        } else {
            ((), current)
        }
    })
}
