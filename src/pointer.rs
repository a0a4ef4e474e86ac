//! Single-owner mutable cells addressed only through state transitions.

use portable_atomic_util::Arc;
use spin::Mutex;

/// Reference identity used to decide whether a transition changed a value.
///
/// Identity is not equality: a transition signals a change by
/// returning a *new* value, and returning the value it was handed is a no-op
/// even if an equal value was rebuilt elsewhere.
pub trait Identity {
    /// Returns `true` when `self` and `other` are the same value.
    fn is_same(&self, other: &Self) -> bool;
}

impl<T> Identity for Arc<T> {
    fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Identity> Identity for Option<T> {
    fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.is_same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Identity for bool {
    fn is_same(&self, other: &Self) -> bool {
        self == other
    }
}

/// A mutable cell whose value is only ever changed by applying a transition.
///
/// A transition receives the held value and returns `(result, next)`. The cell
/// stores `next` only if it differs by [`Identity`] from the value the
/// transition was given; the `result` is handed back to the caller.
///
/// Cloning a `Pointer` yields another handle to the **same** cell.
///
/// ```rust
/// use statelet::{Arc, Pointer};
///
/// let pointer = Pointer::new(Arc::new(1));
/// let doubled = pointer.apply(|n| (*n * 2, Arc::new(*n + 1)));
///
/// assert_eq!(doubled, 2);
/// assert_eq!(*pointer.get(), 2);
/// ```
pub struct Pointer<T> {
    cell: Arc<Mutex<T>>,
}

impl<T> Clone for Pointer<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Identity + Clone> Pointer<T> {
    /// Create a pointer owning `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            cell: Arc::new(Mutex::new(initial)),
        }
    }

    /// Apply a state transition to the held value.
    ///
    /// The lock is released while `transition` runs, so transitions may
    /// re-enter other pointers (or this one) freely.
    pub fn apply<R>(&self, transition: impl FnOnce(T) -> (R, T)) -> R {
        let held = (*self.cell.lock()).clone();
        let witness = held.clone();

        let (result, next) = transition(held);

        if !next.is_same(&witness) {
            // The previous value is dropped after the guard is released.
            let _previous = core::mem::replace(&mut *self.cell.lock(), next);
        }

        result
    }

    /// Read the held value.
    pub fn get(&self) -> T {
        self.apply(|value| (value.clone(), value))
    }

    /// Replace the held value.
    pub fn set(&self, value: T) {
        self.apply(move |_| ((), value))
    }
}
