use std::time::Duration;

use tokio::time::Instant;

use crate::tier::QuotaRule;

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Call may proceed now; the slot has been recorded
    Granted,

    /// Quota exhausted; re-check after the given wait
    RetryAfter(Duration),
}

/// Consumed-quota tracker with lazy elapsed-time decay
///
/// Owned exclusively by the dispatch loop, so all accounting happens through
/// `&mut self` with no synchronization. On every check, whole windows elapsed
/// since the last accounting each free `capacity` slots (clamped at zero
/// consumed); partial windows free nothing, which keeps burst admission on the
/// conservative side of the nominal quota.
#[derive(Debug)]
pub struct CapacityGate {
    rule: QuotaRule,

    /// Calls admitted within the window starting at `window_open`
    consumed: u32,

    /// Start of the accounting window
    window_open: Instant,
}

impl CapacityGate {
    /// Create a gate with nothing consumed
    pub fn new(rule: QuotaRule) -> Self {
        Self { rule, consumed: 0, window_open: Instant::now() }
    }

    /// Check whether one call may be admitted at `now`
    ///
    /// Granting records the admission immediately; a denial reports the time
    /// remaining until decay frees a slot.
    pub fn poll(&mut self, now: Instant) -> Admission {
        self.decay(now);

        if self.consumed < self.rule.capacity {
            if self.consumed == 0 {
                // Idle gate: anchor the window at this admission
                self.window_open = now;
            }
            self.consumed += 1;
            return Admission::Granted;
        }

        let since = now.saturating_duration_since(self.window_open);
        Admission::RetryAfter(self.rule.window.saturating_sub(since))
    }

    /// Free capacity for each whole window elapsed since the last accounting
    fn decay(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.window_open);
        if elapsed < self.rule.window {
            return;
        }

        let whole_windows = elapsed.as_nanos() / self.rule.window.as_nanos();
        let freed = u128::from(self.rule.capacity).saturating_mul(whole_windows);

        if freed >= u128::from(self.consumed) {
            self.consumed = 0;
            self.window_open = now;
        } else {
            // freed < consumed <= u32::MAX, so both casts are in range
            self.consumed -= freed as u32;
            self.window_open += self.rule.window * whole_windows as u32;
        }
    }

    /// Calls currently counted against the window
    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    /// The rule this gate enforces
    pub fn rule(&self) -> QuotaRule {
        self.rule
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_grants_up_to_capacity() {
        let mut gate = CapacityGate::new(QuotaRule::per_second(3));
        let now = Instant::now();

        assert_eq!(gate.poll(now), Admission::Granted);
        assert_eq!(gate.poll(now), Admission::Granted);
        assert_eq!(gate.poll(now), Admission::Granted);
        assert_eq!(gate.consumed(), 3);

        match gate.poll(now) {
            Admission::RetryAfter(wait) => assert_eq!(wait, Duration::from_secs(1)),
            Admission::Granted => panic!("expected denial at capacity"),
        }
    }

    #[test]
    fn test_retry_after_shrinks_with_elapsed_time() {
        let mut gate = CapacityGate::new(QuotaRule::per_second(1));
        let start = Instant::now();

        assert_eq!(gate.poll(start), Admission::Granted);

        let later = start + Duration::from_millis(400);
        match gate.poll(later) {
            Admission::RetryAfter(wait) => assert_eq!(wait, Duration::from_millis(600)),
            Admission::Granted => panic!("expected denial"),
        }
    }

    #[test]
    fn test_whole_window_frees_capacity() {
        let mut gate = CapacityGate::new(QuotaRule::per_second(2));
        let start = Instant::now();

        assert_eq!(gate.poll(start), Admission::Granted);
        assert_eq!(gate.poll(start), Admission::Granted);

        // Partial window frees nothing
        assert!(matches!(gate.poll(start + Duration::from_millis(999)), Admission::RetryAfter(_)));

        // One whole window frees the full capacity
        assert_eq!(gate.poll(start + Duration::from_secs(1)), Admission::Granted);
        assert_eq!(gate.consumed(), 1);
    }

    #[test]
    fn test_decay_clamps_at_zero() {
        let mut gate = CapacityGate::new(QuotaRule::per_second(5));
        let start = Instant::now();

        assert_eq!(gate.poll(start), Admission::Granted);

        // Many idle windows must not underflow the counter
        assert_eq!(gate.poll(start + Duration::from_secs(3600)), Admission::Granted);
        assert_eq!(gate.consumed(), 1);
    }

    #[test]
    fn test_idle_gate_reanchors_window() {
        let mut gate = CapacityGate::new(QuotaRule::per_second(1));
        let start = Instant::now();

        assert_eq!(gate.poll(start), Admission::Granted);

        // Long idle, then an admission: the next denial must wait a full
        // window from the new admission, not from the stale window start
        let resume = start + Duration::from_secs(100);
        assert_eq!(gate.poll(resume), Admission::Granted);
        match gate.poll(resume) {
            Admission::RetryAfter(wait) => assert_eq!(wait, Duration::from_secs(1)),
            Admission::Granted => panic!("expected denial"),
        }
    }

    proptest! {
        // Polling at arbitrary forward time steps never overruns capacity and
        // never panics, for any rule in the tier table's range
        #[test]
        fn prop_consumed_bounded(capacity in 1u32..64, window_ms in 1u64..10_000, steps in proptest::collection::vec(0u64..100_000_000, 1..200)) {
            let mut gate = CapacityGate::new(QuotaRule::new(capacity, Duration::from_millis(window_ms)));
            let mut now = Instant::now();

            for step in steps {
                now += Duration::from_micros(step);
                let _ = gate.poll(now);
                prop_assert!(gate.consumed() <= capacity);
            }
        }
    }
}
