//! Observable state cell: a pointer that broadcasts every change.

use portable_atomic_util::Arc;

use crate::{Broadcast, Consumer, Error, Pointer, Subscription};

/// A [`Pointer`] to shared state, augmented with a [`Broadcast`] fired on change.
///
/// Every identity-changing transition notifies subscribers exactly once with
/// the new value, before [`apply`](Self::apply) returns. After
/// [`dispose`](Self::dispose) the backing value is gone and every operation
/// that reads it fails with [`Error::Disposed`].
///
/// Cloning a `State` yields another handle to the same cell.
///
/// # Example
///
/// ```rust
/// use statelet::{create_state, Consumer};
///
/// let state = create_state(0);
/// state.subscribe(Consumer::new(|value: &statelet::Arc<i32>| assert_eq!(**value, 5)));
///
/// state.set(5).unwrap();
/// assert_eq!(*state.get().unwrap(), 5);
/// ```
pub struct State<T> {
    value: Pointer<Option<Arc<T>>>,
    broadcast: Broadcast<Arc<T>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            broadcast: self.broadcast.clone(),
        }
    }
}

impl<T> State<T> {
    /// Create a state cell around an already shared value.
    pub fn from_arc(initial: Arc<T>) -> Self {
        Self {
            value: Pointer::new(Some(initial)),
            broadcast: Broadcast::new(),
        }
    }

    /// Apply a state transition.
    ///
    /// If the returned state is not the one the transition received, it is
    /// stored and broadcast to subscribers before the result is returned.
    pub fn apply<R>(&self, transition: impl FnOnce(Arc<T>) -> (R, Arc<T>)) -> Result<R, Error> {
        let current = self.value.get().ok_or(Error::Disposed)?;
        let (result, next) = transition(current.clone());

        if !Arc::ptr_eq(&next, &current) {
            self.value.set(Some(next.clone()));
            self.broadcast.notify(&next);
        }

        Ok(result)
    }

    pub fn get(&self) -> Result<Arc<T>, Error> {
        self.value.get().ok_or(Error::Disposed)
    }

    /// Store `value` as a fresh state, always notifying subscribers.
    pub fn set(&self, value: T) -> Result<(), Error> {
        self.replace(Arc::new(value))
    }

    /// Store a shared state. Replacing the state with itself is a no-op.
    pub fn replace(&self, value: Arc<T>) -> Result<(), Error> {
        self.apply(move |_| ((), value))
    }

    pub fn unsubscribe(&self, consumer: &Consumer<Arc<T>>) {
        self.broadcast.unsubscribe(consumer)
    }

    pub fn subscriber_count(&self) -> usize {
        self.broadcast.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.value.get().is_none()
    }

    /// Drop every subscriber and clear the backing value.
    pub fn dispose(&self) {
        self.broadcast.dispose();
        self.value.set(None);
    }
}

impl<T: 'static> State<T> {
    pub fn new(initial: T) -> Self {
        Self::from_arc(Arc::new(initial))
    }

    pub fn subscribe(&self, consumer: Consumer<Arc<T>>) -> Subscription {
        self.broadcast.subscribe(consumer)
    }
}

/// Create an observable state cell holding `initial`.
pub fn create_state<T: 'static>(initial: T) -> State<T> {
    State::new(initial)
}
