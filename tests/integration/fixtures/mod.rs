use statelet::{Getter, Lens};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Counter {
    pub(crate) count: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Status {
    pub(crate) status: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum CounterAction {
    Increment,
    Decrement,
}

pub(crate) fn count_lens() -> Lens<Counter, i32> {
    Lens::new(|state: &Counter| state.count, |count, _: &Counter| Counter { count })
}

pub(crate) fn count_getter() -> Getter<Counter, i32> {
    Getter::new(|state: &Counter| state.count)
}

pub(crate) fn status_lens() -> Lens<Status, String> {
    Lens::new(
        |state: &Status| state.status.clone(),
        |status, _: &Status| Status { status },
    )
}

pub(crate) fn status_getter() -> Getter<Status, String> {
    Getter::new(|state: &Status| state.status.clone())
}

/// Where a component publishes its status reports.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait StatusSink {
    fn publish(&self, status: String);
}
