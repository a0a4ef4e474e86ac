//! Error type shared by every fallible runtime operation.

#[cfg(feature = "no_std")]
use alloc::string::String;

/// Errors surfaced by the component runtime.
///
/// The runtime never recovers from these locally; they propagate to the
/// call site that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An action kind tag that is not one of `state`, `reader`, `invoke` or `reducer`.
    #[error("invalid action type: {0}")]
    InvalidActionType(String),

    /// The component (or the state cell backing it) has been disposed or dropped.
    #[error("component has been disposed")]
    Disposed,

    /// A command was dispatched for a type with no registered handler.
    #[error("no handler registered for `{0}`")]
    UnknownCommand(String),

    /// The payload handed to a named callable is not the type it was registered with.
    #[error("payload type mismatch for `{0}`")]
    PayloadType(String),

    /// The caller asked a named callable for a result type it does not produce.
    #[error("output type mismatch for `{0}`")]
    OutputType(String),
}
