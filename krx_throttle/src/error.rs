use thiserror::Error;

/// Errors surfaced to a caller waiting on a throttled call
///
/// Queue-full and quota-exhausted conditions never appear here; both are
/// handled by blocking. The only failures a caller can observe are the
/// transport's own error, passed through verbatim, and a throttle whose
/// dispatch task is gone.
#[derive(Debug, Error)]
pub enum CallError<E> {
    /// The transport reported a failure executing the request
    #[error("request execution failed: {0}")]
    Failed(#[source] E),

    /// The dispatch task has shut down; the call was never executed
    #[error("throttle worker has shut down")]
    Closed,
}

impl<E> CallError<E> {
    /// True if this is a transport failure (as opposed to a dead throttle)
    pub fn is_transport(&self) -> bool {
        matches!(self, CallError::Failed(_))
    }
}
