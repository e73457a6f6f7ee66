//! Kraken public API transport
//!
//! Every Kraken REST response wraps its payload in a common envelope:
//! `{ "error": [...], "result": ... }`. A non-empty error array means the
//! exchange rejected the call (rate violations included), so it surfaces as a
//! transport error and the throttle core arms its cooldown.

use krx_throttle::ExecuteFuture;
use krx_throttle::Transport;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::client::HttpClient;
use crate::client::HttpClientConfig;
use crate::errors::HttpError;
use crate::errors::Result;

const KRAKEN_BASE_URL: &str = "https://api.kraken.com";
const API_VERSION: &str = "0";

/// Descriptor for one public REST call
///
/// The throttle passes this through unexamined; only the transport reads it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    path: String,
    params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Request for a public endpoint, e.g. `Time`, `Trades`, `Depth`
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), params: Vec::new() }
    }

    /// Append a form parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    error: Vec<String>,

    #[serde(default)]
    result: Value,
}

/// Kraken public REST transport
///
/// Implements [`Transport`] with `Response = serde_json::Value`; decoding the
/// payload into endpoint-specific types stays with the caller.
pub struct KrakenTransport {
    client: HttpClient,
    base_url: Url,
}

impl KrakenTransport {
    /// Create a transport against the production API with default HTTP
    /// configuration
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the transport
    pub fn builder() -> KrakenTransportBuilder {
        KrakenTransportBuilder::default()
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("/{API_VERSION}/public/{path}"))?)
    }

    async fn execute_inner(&self, request: ApiRequest) -> Result<Value> {
        let url = self.endpoint_url(&request.path)?;
        debug!(path = %request.path, "sending public API request");

        let response = self.client.post(url.as_str()).form(&request.params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::InvalidResponse(format!("HTTP {status}")));
        }

        let bytes = response.bytes().await?;
        let envelope: Envelope = serde_json::from_slice(&bytes)?;

        if !envelope.error.is_empty() {
            return Err(HttpError::Api(envelope.error.join(", ")));
        }

        Ok(envelope.result)
    }
}

impl Transport for KrakenTransport {
    type Request = ApiRequest;
    type Response = Value;
    type Error = HttpError;

    fn execute(&self, request: ApiRequest) -> ExecuteFuture<'_, Value, HttpError> {
        Box::pin(self.execute_inner(request))
    }
}

/// Builder for configuring a [`KrakenTransport`]
pub struct KrakenTransportBuilder {
    http_config: HttpClientConfig,
    base_url: String,
}

impl Default for KrakenTransportBuilder {
    fn default() -> Self {
        Self { http_config: HttpClientConfig::default(), base_url: KRAKEN_BASE_URL.to_string() }
    }
}

impl KrakenTransportBuilder {
    /// Set custom base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Configure HTTP client settings
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Build the transport
    pub fn build(self) -> Result<KrakenTransport> {
        let client = HttpClient::with_config(self.http_config)?;
        let base_url = Url::parse(&self.base_url)?;

        Ok(KrakenTransport { client, base_url })
    }
}
