//! Test helpers for observing broadcasts.

#[cfg(feature = "no_std")]
use alloc::vec::Vec;

use portable_atomic_util::Arc;
use spin::Mutex;

use crate::Consumer;

/// Records every value delivered to its consumer, for assertions.
///
/// Only available with the `testing` feature.
///
/// [`consumer`](Self::consumer) always returns a handle to the same
/// subscriber, so it can be passed to both `subscribe` and `unsubscribe`.
///
/// # Example
///
/// ```rust
/// use statelet::{create_state, Arc, Recorder};
///
/// let state = create_state(0);
/// let recorder = Recorder::<Arc<i32>>::new();
/// state.subscribe(recorder.consumer());
///
/// state.set(1).unwrap();
/// state.set(2).unwrap();
///
/// assert_eq!(recorder.count(), 2);
/// recorder.with_records(|records| {
///     assert_eq!(*records[0], 1);
///     assert_eq!(*records[1], 2);
/// });
/// ```
pub struct Recorder<T> {
    records: Arc<Mutex<Vec<T>>>,
    consumer: Consumer<T>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            consumer: self.consumer.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Recorder<T> {
    pub fn new() -> Self {
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = records.clone();
        let consumer = Consumer::new(move |value: &T| sink.lock().push(value.clone()));
        Self { records, consumer }
    }

    pub fn consumer(&self) -> Consumer<T> {
        self.consumer.clone()
    }

    /// Number of values recorded so far.
    pub fn count(&self) -> usize {
        self.records.lock().len()
    }

    pub fn last(&self) -> Option<T> {
        self.records.lock().last().cloned()
    }

    /// Access the recorded values with a closure.
    pub fn with_records<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Vec<T>) -> R,
    {
        let records = self.records.lock();
        f(&records)
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}
