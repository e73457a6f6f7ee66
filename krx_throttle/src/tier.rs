use std::time::Duration;

/// Admitted-call capacity over a rolling time window.
///
/// Selected once at throttle construction, never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaRule {
    /// Maximum calls admitted within one window
    pub capacity: u32,

    /// Window over which capacity replenishes
    pub window: Duration,
}

impl QuotaRule {
    /// Create a quota rule
    pub fn new(capacity: u32, window: Duration) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        assert!(!window.is_zero(), "Window duration must be greater than 0");

        Self { capacity, window }
    }

    /// Rule allowing `capacity` calls per second
    pub fn per_second(capacity: u32) -> Self {
        Self::new(capacity, Duration::from_secs(1))
    }
}

/// Account verification tiers and their call quotas
///
/// Matches the tiered counter limits published for the exchange REST API:
/// higher verification levels get a larger counter and a faster decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Unauthenticated endpoints: 1 call per second
    Public,
    /// Starter verification: 15 calls per 3 seconds
    Starter,
    /// Intermediate verification: 20 calls per 2 seconds
    Intermediate,
    /// Pro verification: 20 calls per second
    Pro,
}

impl Tier {
    /// Look up the quota rule for this tier
    pub const fn rule(self) -> QuotaRule {
        match self {
            Tier::Public => QuotaRule { capacity: 1, window: Duration::from_secs(1) },
            Tier::Starter => QuotaRule { capacity: 15, window: Duration::from_secs(3) },
            Tier::Intermediate => QuotaRule { capacity: 20, window: Duration::from_secs(2) },
            Tier::Pro => QuotaRule { capacity: 20, window: Duration::from_secs(1) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_table() {
        assert_eq!(Tier::Public.rule(), QuotaRule::per_second(1));
        assert_eq!(Tier::Starter.rule(), QuotaRule::new(15, Duration::from_secs(3)));
        assert_eq!(Tier::Intermediate.rule(), QuotaRule::new(20, Duration::from_secs(2)));
        assert_eq!(Tier::Pro.rule(), QuotaRule::per_second(20));
    }

    #[test]
    #[should_panic(expected = "Capacity must be greater than 0")]
    fn test_zero_capacity_rejected() {
        let _ = QuotaRule::new(0, Duration::from_secs(1));
    }

    #[test]
    #[should_panic(expected = "Window duration must be greater than 0")]
    fn test_zero_window_rejected() {
        let _ = QuotaRule::new(1, Duration::ZERO);
    }
}
