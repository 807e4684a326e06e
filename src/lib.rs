//! # reqwest-proxy-rotator
//!
//! Random proxy rotation with linear retry for reqwest.
//!
//! A [`ProxyPool`] is loaded from a proxy-list provider with [`fetch_pool`].
//! Each call to [`RequestExecutor::get`] then picks one proxy at random,
//! builds a single-use client bound to it with a [`RetryPolicy`] wired in,
//! issues the request and records the outcome with a [`MetricsRecorder`].

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod middleware;
pub mod pool;
pub mod provider;
pub mod proxy;

pub use client::{ClientBinding, ProxyClientFactory, REQUEST_TIMEOUT};
pub use config::{MetricsConfig, ProviderConfig, ProviderConfigBuilder, RetryPolicy, RetryPolicyBuilder};
pub use error::{EmptyPool, Error, RetriesExhausted};
pub use executor::RequestExecutor;
pub use metrics::MetricsRecorder;
pub use middleware::RetryMiddleware;
pub use pool::ProxyPool;
pub use provider::fetch_pool;
pub use proxy::ProxyDescriptor;
