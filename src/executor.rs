//! Execution of logical requests through a freshly bound proxy client.

use crate::client::ProxyClientFactory;
use crate::config::RetryPolicy;
use crate::error::Error;
use crate::metrics::MetricsRecorder;
use crate::pool::ProxyPool;

use log::debug;
use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use reqwest::{Method, Response};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Issues requests through a random proxy of the current pool.
///
/// Every call selects its own proxy and builds its own client, so calls are
/// independent and may run concurrently. The pool can be swapped with
/// [`replace_pool`](Self::replace_pool); calls already running keep the pool
/// they started with.
pub struct RequestExecutor {
    pool: RwLock<Arc<ProxyPool>>,
    metrics: MetricsRecorder,
}

impl RequestExecutor {
    /// Create an executor over `pool`, recording into `metrics`.
    pub fn new(pool: ProxyPool, metrics: MetricsRecorder) -> Self {
        Self {
            pool: RwLock::new(Arc::new(pool)),
            metrics,
        }
    }

    /// Snapshot of the current pool.
    pub fn pool(&self) -> Arc<ProxyPool> {
        Arc::clone(&self.pool.read())
    }

    /// Atomically replace the pool used by subsequent requests.
    pub fn replace_pool(&self, pool: ProxyPool) {
        *self.pool.write() = Arc::new(pool);
    }

    /// The recorder request outcomes are counted in.
    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Perform a GET through a random proxy, retrying per `policy`.
    ///
    /// A response is only returned, and counted, once the retry middleware
    /// is done with it; requests that fail outright are not counted.
    pub async fn get(&self, url: &str, headers: HeaderMap, policy: &RetryPolicy) -> Result<Response, Error> {
        let target = Url::parse(url).map_err(|source| Error::InvalidRequestUrl {
            url: url.to_string(),
            source,
        })?;

        let binding = ProxyClientFactory::new(self.pool()).build(policy, &headers)?;
        let (client, proxy_address) = binding.into_parts();

        let response = client
            .request(Method::GET, target)
            .headers(headers)
            .send()
            .await?;

        debug!("GET {} via {} returned {}", url, proxy_address, response.status());
        self.metrics
            .record_request(response.status().as_u16(), Method::GET.as_str(), &proxy_address);

        Ok(response)
    }

    /// Like [`get`](Self::get), but gives up once `deadline` has elapsed,
    /// whatever retries are still pending.
    pub async fn get_with_deadline(
        &self,
        url: &str,
        headers: HeaderMap,
        policy: &RetryPolicy,
        deadline: Duration,
    ) -> Result<Response, Error> {
        tokio::time::timeout(deadline, self.get(url, headers, policy))
            .await
            .map_err(|_| Error::DeadlineExceeded(deadline))?
    }
}
