//! Simple example of using reqwest-proxy-rotator.

use prometheus::{Encoder, Registry, TextEncoder};
use reqwest::header::HeaderMap;
use reqwest_proxy_rotator::{fetch_pool, MetricsConfig, MetricsRecorder, ProviderConfig, RequestExecutor, RetryPolicy};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let api_key = std::env::args().nth(1).unwrap_or_default();

    let metrics = MetricsRecorder::new(MetricsConfig::new("simple"))?;
    let registry = Registry::new();
    metrics.register(&registry)?;

    println!("Fetching proxy list...");
    let pool = fetch_pool(&ProviderConfig::default(), &api_key, &metrics).await?;
    println!("Loaded {} proxies", pool.len());

    let executor = RequestExecutor::new(pool, metrics);

    let policy = RetryPolicy::builder()
        .max_retries(2)
        .wait_min(Duration::from_secs(1))
        .wait_max(Duration::from_secs(3))
        .backoff_step(Duration::from_secs(1))
        .build();

    println!("Sending request...");
    let response = executor
        .get_with_deadline("http://httpbin.org/ip", HeaderMap::new(), &policy, Duration::from_secs(30))
        .await?;

    println!("Status: {}", response.status());
    println!("Response: {}", response.text().await?);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    println!("{}", String::from_utf8(buffer)?);

    Ok(())
}
