//! Configuration for retries, the proxy-list provider and metrics.

use std::time::Duration;

use crate::error::Error;

/// Default endpoint of the proxy-list provider.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.myprivateproxy.net/v1/fetchProxies/json";

/// Retry behaviour applied to each logical request.
///
/// Backoff between attempts is linear: the wait before retry `n` is
/// `backoff_step * n`, with `n` starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt.
    pub max_retries: u32,
    pub wait_min: Duration,
    pub wait_max: Duration,
    pub backoff_step: Duration,
}

impl RetryPolicy {
    /// Create a policy from explicit values.
    pub const fn new(max_retries: u32, wait_min: Duration, wait_max: Duration, backoff_step: Duration) -> Self {
        Self {
            max_retries,
            wait_min,
            wait_max,
            backoff_step,
        }
    }

    /// Create a new policy builder.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Delay before the given retry attempt (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }

    /// Check that `wait_min <= wait_max`. Construction does not enforce this.
    pub fn validate(&self) -> Result<(), Error> {
        if self.wait_min > self.wait_max {
            return Err(Error::InvalidRetryPolicy {
                wait_min: self.wait_min,
                wait_max: self.wait_max,
            });
        }
        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicyBuilder::new().build()
    }
}

/// Builder for `RetryPolicy`.
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    max_retries: Option<u32>,
    wait_min: Option<Duration>,
    wait_max: Option<Duration>,
    backoff_step: Option<Duration>,
}

impl RetryPolicyBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retries after the initial attempt.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the minimum wait between attempts.
    pub fn wait_min(mut self, wait: Duration) -> Self {
        self.wait_min = Some(wait);
        self
    }

    /// Set the maximum wait between attempts.
    pub fn wait_max(mut self, wait: Duration) -> Self {
        self.wait_max = Some(wait);
        self
    }

    /// Set the linear backoff step.
    pub fn backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = Some(step);
        self
    }

    /// Build the policy.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.unwrap_or(4),
            wait_min: self.wait_min.unwrap_or(Duration::from_secs(1)),
            wait_max: self.wait_max.unwrap_or(Duration::from_secs(30)),
            backoff_step: self.backoff_step.unwrap_or(Duration::from_secs(1)),
        }
    }
}

/// Where and how to fetch the proxy list.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base endpoint; `/full/showLocation/<key>` is appended to it.
    pub base_url: String,
    /// Timeout for the whole provider call.
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::new()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfigBuilder::new().build()
    }
}

/// Builder for `ProviderConfig`.
#[derive(Debug, Default)]
pub struct ProviderConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ProviderConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider base endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the timeout for the provider call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ProviderConfig {
        ProviderConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string()),
            timeout: self.timeout.unwrap_or(Duration::from_secs(10)),
        }
    }
}

/// Naming and exposure switches for the metric families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Prefix of every metric name.
    pub namespace: String,
    /// Expose `<namespace>_external_http_requests_total`.
    pub request_counter: bool,
    /// Expose `<namespace>_proxy_count`.
    pub proxy_counter: bool,
}

impl MetricsConfig {
    /// Create a configuration with both families exposed under `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: "proxy_rotator".to_string(),
            request_counter: true,
            proxy_counter: true,
        }
    }
}
