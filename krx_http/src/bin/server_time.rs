//! Throttled calls against the live public API
//!
//! Submits a short burst of `Time` requests through a public-tier throttle;
//! the debug logs show the 1/s pacing the dispatch loop enforces.

use krx_http::ApiRequest;
use krx_http::KrakenTransport;
use krx_throttle::Throttle;
use krx_throttle::Tier;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::builder().with_default_directive(Level::INFO.into()).from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let transport = KrakenTransport::new()?;
    let throttle = Throttle::new(transport, Tier::Public);

    for attempt in 0..3u32 {
        let time = throttle.call(ApiRequest::new("Time")).await?;
        info!(attempt, %time, "server time");
    }

    Ok(())
}
