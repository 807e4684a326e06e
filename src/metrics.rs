//! Request-outcome and proxy-inventory counters.

use crate::config::MetricsConfig;
use crate::error::Error;
use crate::proxy::ProxyDescriptor;

use prometheus::{IntCounterVec, Opts, Registry};

const REQUESTS_HELP: &str =
    "How many external HTTP requests processed, partitioned by status code, method, and proxy IP.";
const PROXIES_HELP: &str =
    "How many proxy servers are configured, partitioned by IP, status, city, region, and country.";

/// Records request outcomes and pool inventory.
///
/// Cloning is cheap and clones share the same counters, so one recorder can be
/// handed to the executor and to pool population alike. Counters only ever go
/// up; exporting them is left to the caller via [`expose`](Self::expose) or
/// [`register`](Self::register).
#[derive(Clone)]
pub struct MetricsRecorder {
    requests: IntCounterVec,
    proxies: IntCounterVec,
    config: MetricsConfig,
}

impl std::fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MetricsRecorder {
    /// Create the counter families under the configured namespace.
    pub fn new(config: MetricsConfig) -> Result<Self, Error> {
        let requests = IntCounterVec::new(
            Opts::new("external_http_requests_total", REQUESTS_HELP).namespace(config.namespace.clone()),
            &["code", "method", "proxy_ip"],
        )?;
        let proxies = IntCounterVec::new(
            Opts::new("proxy_count", PROXIES_HELP).namespace(config.namespace.clone()),
            &["ip", "status", "city", "region", "country"],
        )?;

        Ok(Self {
            requests,
            proxies,
            config,
        })
    }

    /// Count one completed request.
    pub fn record_request(&self, status: u16, method: &str, proxy_address: &str) {
        let code = status.to_string();
        self.requests
            .with_label_values(&[code.as_str(), method, proxy_address])
            .inc();
    }

    /// Count every descriptor of a freshly loaded pool, duplicates included.
    pub fn record_pool_load<'a, I>(&self, descriptors: I)
    where
        I: IntoIterator<Item = &'a ProxyDescriptor>,
    {
        for proxy in descriptors {
            self.proxies
                .with_label_values(&[
                    proxy.address.as_str(),
                    proxy.status.as_str(),
                    proxy.city.as_str(),
                    proxy.region.as_str(),
                    proxy.country.as_str(),
                ])
                .inc();
        }
    }

    /// Request outcomes by `code`, `method` and `proxy_ip`.
    pub fn requests(&self) -> &IntCounterVec {
        &self.requests
    }

    /// Pool inventory by `ip`, `status`, `city`, `region` and `country`.
    pub fn proxies(&self) -> &IntCounterVec {
        &self.proxies
    }

    /// The counter families enabled by the configuration switches.
    pub fn expose(&self) -> Vec<IntCounterVec> {
        let mut exposed = Vec::new();
        if self.config.request_counter {
            exposed.push(self.requests.clone());
        }
        if self.config.proxy_counter {
            exposed.push(self.proxies.clone());
        }
        exposed
    }

    /// Register the enabled counter families with a Prometheus registry.
    pub fn register(&self, registry: &Registry) -> Result<(), Error> {
        for family in self.expose() {
            registry.register(Box::new(family))?;
        }
        Ok(())
    }
}
