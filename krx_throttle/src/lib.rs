//! Client-side request throttle for rate-limited exchange APIs
//!
//! Application code hands opaque requests to a [`Throttle`], which queues them,
//! admits them against a tiered quota (N calls per rolling window), and executes
//! them through a caller-supplied [`Transport`]. A failed execution arms a
//! cooldown that delays the next admission beyond the normal quota wait.
//!
//! All quota accounting lives on a single dispatch task; producers and the
//! execution tasks only ever talk to it over channels.

pub mod call;
pub mod error;
pub mod gate;
pub mod throttle;
pub mod tier;
pub mod transport;

mod backoff;
mod worker;

pub use call::CallHandle;
pub use error::CallError;
pub use gate::Admission;
pub use gate::CapacityGate;
pub use throttle::Throttle;
pub use throttle::ThrottleBuilder;
pub use tier::QuotaRule;
pub use tier::Tier;
pub use transport::ExecuteFuture;
pub use transport::Transport;
