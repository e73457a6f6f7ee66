use std::time::Duration;

use tokio::sync::mpsc;

/// Sender half handed to execution tasks; one message per observed failure
pub(crate) type FailureSender = mpsc::UnboundedSender<()>;

/// Cooldown controller armed by execution failures
///
/// Failures reach the dispatch loop as messages on a control channel rather
/// than a shared flag, so the loop remains the only task touching rate state.
/// However many failures queue up, at most one cooldown is owed at a time.
#[derive(Debug)]
pub(crate) struct BackoffController {
    failures: mpsc::UnboundedReceiver<()>,
    cooldown: Duration,
}

impl BackoffController {
    pub(crate) fn new(cooldown: Duration) -> (FailureSender, Self) {
        let (tx, failures) = mpsc::unbounded_channel();
        (tx, Self { failures, cooldown })
    }

    /// Cooldown to serve before the next admission, if any failure has been
    /// reported since the last check. Taking it drains every queued signal.
    pub(crate) fn owed(&mut self) -> Option<Duration> {
        if self.drain() {
            Some(self.cooldown)
        } else {
            None
        }
    }

    /// Drain queued failure signals, reporting whether there were any
    ///
    /// Called again after a cooldown sleep so failures that landed during the
    /// sleep are absorbed by it instead of stacking a second cooldown.
    pub(crate) fn drain(&mut self) -> bool {
        let mut any = false;
        while self.failures.try_recv().is_ok() {
            any = true;
        }
        any
    }
}
