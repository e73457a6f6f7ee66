use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio::time::Instant;
use tracing::debug;
use tracing::warn;

use crate::backoff::BackoffController;
use crate::backoff::FailureSender;
use crate::call::PendingCall;
use crate::gate::Admission;
use crate::gate::CapacityGate;
use crate::transport::Transport;

pub(crate) type Call<T> =
    PendingCall<<T as Transport>::Request, <T as Transport>::Response, <T as Transport>::Error>;

/// The single dispatch task draining the admission queue
///
/// Owns the capacity gate and the backoff controller outright. For each call:
/// serve an owed cooldown, wait out the quota if exhausted, then launch the
/// execution on its own task and move straight to the next call. Completion
/// order is therefore not admission order.
pub(crate) struct Worker<T: Transport> {
    transport: Arc<T>,
    queue: mpsc::Receiver<Call<T>>,
    gate: CapacityGate,
    backoff: BackoffController,
    failure_tx: FailureSender,
}

impl<T: Transport> Worker<T> {
    pub(crate) fn new(
        transport: Arc<T>,
        queue: mpsc::Receiver<Call<T>>,
        gate: CapacityGate,
        backoff: BackoffController,
        failure_tx: FailureSender,
    ) -> Self {
        Self { transport, queue, gate, backoff, failure_tx }
    }

    pub(crate) async fn run(mut self) {
        while let Some(call) = self.queue.recv().await {
            if let Some(cooldown) = self.backoff.owed() {
                debug!(?cooldown, "execution failure reported, cooling down");
                sleep(cooldown).await;
                // Failures that landed during the sleep are covered by it
                self.backoff.drain();
            }

            loop {
                match self.gate.poll(Instant::now()) {
                    Admission::Granted => break,
                    Admission::RetryAfter(wait) => {
                        debug!(?wait, consumed = self.gate.consumed(), "quota exhausted, waiting");
                        sleep(wait).await;
                    }
                }
            }

            self.dispatch(call);
        }

        debug!("all throttle handles dropped, dispatch loop exiting");
    }

    /// Launch one admitted call without waiting for the round trip
    fn dispatch(&self, call: Call<T>) {
        let transport = Arc::clone(&self.transport);
        let failure_tx = self.failure_tx.clone();
        let (request, slot) = call.into_parts();

        tokio::spawn(async move {
            let outcome = transport.execute(request).await;
            if let Err(err) = &outcome {
                warn!(error = %err, "request execution failed, arming cooldown");
                let _ = failure_tx.send(());
            }
            slot.complete(outcome);
        });
    }
}
