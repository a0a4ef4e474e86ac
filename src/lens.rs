//! Getter/setter pairs narrowing a pure function's view of state.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;

use portable_atomic_util::Arc;

/// Narrows state `S` to a view `V` and writes an updated view back.
///
/// The setter receives the whole current state and returns the next one.
/// Lenses built with [`shared`](Self::shared) may return the current `Arc`
/// to signal "no change"; lenses built with [`new`](Self::new) always
/// produce a new state.
#[allow(clippy::type_complexity)]
pub struct Lens<S, V> {
    getter: Box<dyn Fn(&Arc<S>) -> V>,
    setter: Box<dyn Fn(V, &Arc<S>) -> Arc<S>>,
}

impl<S: 'static, V: 'static> Lens<S, V> {
    /// # Example
    ///
    /// ```rust
    /// use statelet::{Arc, Lens};
    ///
    /// struct Counter { count: i32, label: &'static str }
    ///
    /// let count = Lens::new(
    ///     |state: &Counter| state.count,
    ///     |count, state: &Counter| Counter { count, ..*state },
    /// );
    ///
    /// let state = Arc::new(Counter { count: 1, label: "clicks" });
    /// let next = count.set(count.get(&state) + 1, &state);
    /// assert_eq!((next.count, next.label), (2, "clicks"));
    /// ```
    pub fn new(
        get: impl Fn(&S) -> V + 'static,
        set: impl Fn(V, &S) -> S + 'static,
    ) -> Self {
        Self {
            getter: Box::new(move |state: &Arc<S>| get(&**state)),
            setter: Box::new(move |value: V, state: &Arc<S>| Arc::new(set(value, &**state))),
        }
    }

    pub fn shared(
        get: impl Fn(&Arc<S>) -> V + 'static,
        set: impl Fn(V, &Arc<S>) -> Arc<S> + 'static,
    ) -> Self {
        Self {
            getter: Box::new(get),
            setter: Box::new(set),
        }
    }
}

impl<S: 'static> Lens<S, Arc<S>> {
    /// The whole state in, the whole state out.
    pub fn identity() -> Self {
        Self::shared(|state: &Arc<S>| state.clone(), |value: Arc<S>, _: &Arc<S>| value)
    }
}

impl<S, V> Lens<S, V> {
    pub fn get(&self, state: &Arc<S>) -> V {
        (self.getter)(state)
    }

    pub fn set(&self, value: V, state: &Arc<S>) -> Arc<S> {
        (self.setter)(value, state)
    }
}

/// A read-only lens.
pub struct Getter<S, V>(Box<dyn Fn(&Arc<S>) -> V>);

impl<S: 'static, V: 'static> Getter<S, V> {
    pub fn new(get: impl Fn(&S) -> V + 'static) -> Self {
        Self(Box::new(move |state: &Arc<S>| get(&**state)))
    }

    pub fn shared(get: impl Fn(&Arc<S>) -> V + 'static) -> Self {
        Self(Box::new(get))
    }
}

impl<S: 'static> Getter<S, Arc<S>> {
    pub fn identity() -> Self {
        Self::shared(|state: &Arc<S>| state.clone())
    }
}

impl<S, V> Getter<S, V> {
    pub fn get(&self, state: &Arc<S>) -> V {
        (self.0)(state)
    }
}
