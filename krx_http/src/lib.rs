//! Kraken public REST transport for `krx_throttle`
//!
//! The throttle core treats request execution as an opaque collaborator; this
//! crate provides that collaborator for the Kraken public API: a pooled
//! reqwest client plus the response-envelope decoding the exchange wraps every
//! payload in. Authentication and endpoint-specific response types are out of
//! scope.

pub mod client;
pub mod errors;
pub mod kraken;

pub use client::HttpClient;
pub use client::HttpClientConfig;
pub use errors::HttpError;
pub use errors::Result;
pub use kraken::ApiRequest;
pub use kraken::KrakenTransport;
pub use kraken::KrakenTransportBuilder;
