use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::backoff::BackoffController;
use crate::call::CallHandle;
use crate::call::PendingCall;
use crate::error::CallError;
use crate::gate::CapacityGate;
use crate::tier::QuotaRule;
use crate::tier::Tier;
use crate::transport::Transport;
use crate::worker::Worker;

/// Default admission queue depth
pub const DEFAULT_QUEUE_DEPTH: usize = 100;

/// Default cooldown inserted after an execution failure
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// Clonable handle submitting requests through the admission queue
///
/// All clones feed the same dispatch loop; the loop exits once every handle
/// has been dropped. Requests are admitted strictly in enqueue order, but may
/// complete out of order since executions run concurrently.
pub struct Throttle<T: Transport> {
    queue: mpsc::Sender<PendingCall<T::Request, T::Response, T::Error>>,
}

impl<T: Transport> Clone for Throttle<T> {
    fn clone(&self) -> Self {
        Self { queue: self.queue.clone() }
    }
}

impl<T: Transport> Throttle<T> {
    /// Create a throttle for the given tier with default queue depth and
    /// cooldown
    ///
    /// Must be called within a Tokio runtime; the dispatch loop is spawned
    /// immediately.
    pub fn new(transport: T, tier: Tier) -> Self {
        Self::builder().tier(tier).build(transport)
    }

    /// Create a builder for configuring a throttle
    pub fn builder() -> ThrottleBuilder {
        ThrottleBuilder::new()
    }

    /// Enqueue a request, returning the handle to wait on
    ///
    /// Suspends while the admission queue is full; a full queue is
    /// backpressure, never an error.
    pub async fn submit(&self, request: T::Request) -> Result<CallHandle<T::Response, T::Error>, CallError<T::Error>> {
        let (call, handle) = PendingCall::new(request);
        self.queue.send(call).await.map_err(|_| CallError::Closed)?;
        Ok(handle)
    }

    /// Submit a request and wait for its outcome
    ///
    /// The transport's error is returned verbatim. There is no automatic
    /// retry; resubmitting is a new call, additionally delayed by any
    /// cooldown the failure armed.
    pub async fn call(&self, request: T::Request) -> Result<T::Response, CallError<T::Error>> {
        self.submit(request).await?.into_outcome().await
    }
}

/// Builder for configuring a [`Throttle`]
pub struct ThrottleBuilder {
    rule: QuotaRule,
    queue_depth: usize,
    cooldown: Duration,
}

impl ThrottleBuilder {
    /// Create a builder with public-tier quota and defaults
    pub fn new() -> Self {
        Self { rule: Tier::Public.rule(), queue_depth: DEFAULT_QUEUE_DEPTH, cooldown: DEFAULT_COOLDOWN }
    }

    /// Use the quota rule of an account tier
    pub fn tier(mut self, tier: Tier) -> Self {
        self.rule = tier.rule();
        self
    }

    /// Use an explicit capacity/window pair
    pub fn rule(mut self, rule: QuotaRule) -> Self {
        self.rule = rule;
        self
    }

    /// Set the admission queue depth (producers block beyond it)
    pub fn queue_depth(mut self, depth: usize) -> Self {
        assert!(depth > 0, "Queue depth must be greater than 0");
        self.queue_depth = depth;
        self
    }

    /// Set the cooldown inserted after an execution failure
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Build the throttle and spawn its dispatch loop
    ///
    /// Must be called within a Tokio runtime.
    pub fn build<T: Transport>(self, transport: T) -> Throttle<T> {
        let (queue_tx, queue_rx) = mpsc::channel(self.queue_depth);
        let (failure_tx, backoff) = BackoffController::new(self.cooldown);
        let gate = CapacityGate::new(self.rule);

        let worker = Worker::new(Arc::new(transport), queue_rx, gate, backoff, failure_tx);
        tokio::spawn(worker.run());

        Throttle { queue: queue_tx }
    }
}

impl Default for ThrottleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
