use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`Transport::execute`]
pub type ExecuteFuture<'a, R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'a>>;

/// The execution collaborator: turns one opaque request into one outcome
///
/// The throttle never inspects requests, responses, or errors; it only needs
/// a way to run one request and learn whether it failed. Implementations are
/// shared across concurrent execution tasks, so `execute` takes `&self`.
pub trait Transport: Send + Sync + 'static {
    /// Request descriptor, passed through unexamined
    type Request: Send + 'static;

    /// Successful outcome, delivered verbatim to the caller
    type Response: Send + 'static;

    /// Failure outcome; also treated as a rate-violation signal
    type Error: std::error::Error + Send + 'static;

    /// Execute one request
    fn execute(&self, request: Self::Request) -> ExecuteFuture<'_, Self::Response, Self::Error>;
}
