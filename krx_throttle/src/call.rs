use tokio::sync::oneshot;

use crate::error::CallError;

/// One queued call: the opaque request plus its completion slot
///
/// Travels through the admission queue to the dispatch loop, which splits it
/// into the request (handed to the transport) and the slot (completed by the
/// execution task).
pub(crate) struct PendingCall<Req, R, E> {
    request: Req,
    respond_to: oneshot::Sender<Result<R, E>>,
}

impl<Req, R, E> PendingCall<Req, R, E> {
    /// Create a call in the not-yet-completed state, paired with the handle
    /// the submitting caller waits on
    pub(crate) fn new(request: Req) -> (Self, CallHandle<R, E>) {
        let (respond_to, rx) = oneshot::channel();
        (Self { request, respond_to }, CallHandle { state: WaitState::Pending(rx) })
    }

    /// Split into the request and its completion slot
    pub(crate) fn into_parts(self) -> (Req, CompletionSlot<R, E>) {
        (self.request, CompletionSlot { respond_to: self.respond_to })
    }
}

/// Write-once completion side of a pending call
///
/// `complete` consumes the slot, so a second completion is unrepresentable.
pub(crate) struct CompletionSlot<R, E> {
    respond_to: oneshot::Sender<Result<R, E>>,
}

impl<R, E> CompletionSlot<R, E> {
    /// Deliver the outcome, waking the caller
    ///
    /// A caller that dropped its handle is simply no longer listening; the
    /// outcome is discarded.
    pub(crate) fn complete(self, outcome: Result<R, E>) {
        let _ = self.respond_to.send(outcome);
    }
}

enum WaitState<R, E> {
    Pending(oneshot::Receiver<Result<R, E>>),
    Done(Result<R, CallError<E>>),
}

/// Caller's side of a pending call
///
/// Obtained from [`Throttle::submit`](crate::Throttle::submit). Waiting is
/// cooperative (no spin) and idempotent: once the call completes, every
/// subsequent wait observes the same stored outcome.
pub struct CallHandle<R, E> {
    state: WaitState<R, E>,
}

impl<R, E> CallHandle<R, E> {
    /// Wait until the call completes, returning a reference to its outcome
    pub async fn wait(&mut self) -> &Result<R, CallError<E>> {
        if let WaitState::Pending(rx) = &mut self.state {
            let outcome = match rx.await {
                Ok(Ok(response)) => Ok(response),
                Ok(Err(err)) => Err(CallError::Failed(err)),
                // Completion slot dropped without a write: the worker is gone
                Err(_) => Err(CallError::Closed),
            };
            self.state = WaitState::Done(outcome);
        }

        match &self.state {
            WaitState::Done(outcome) => outcome,
            WaitState::Pending(_) => unreachable!("state set to Done above"),
        }
    }

    /// Wait until the call completes and take ownership of the outcome
    pub async fn into_outcome(self) -> Result<R, CallError<E>> {
        match self.state {
            WaitState::Pending(rx) => match rx.await {
                Ok(Ok(response)) => Ok(response),
                Ok(Err(err)) => Err(CallError::Failed(err)),
                Err(_) => Err(CallError::Closed),
            },
            WaitState::Done(outcome) => outcome,
        }
    }
}
