//! Construction of single-use clients bound to one proxy.

use crate::config::RetryPolicy;
use crate::error::Error;
use crate::middleware::RetryMiddleware;
use crate::pool::ProxyPool;
use crate::proxy::ProxyDescriptor;

use log::debug;
use reqwest::header::{HeaderMap, PROXY_AUTHORIZATION};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::sync::Arc;
use std::time::Duration;

/// Timeout applied to every attempt made by a built client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A client together with the proxy it routes through.
pub struct ClientBinding {
    client: ClientWithMiddleware,
    proxy: ProxyDescriptor,
}

impl std::fmt::Debug for ClientBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBinding")
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

impl ClientBinding {
    /// The client routing through the bound proxy.
    pub fn client(&self) -> &ClientWithMiddleware {
        &self.client
    }

    /// The descriptor chosen at build time.
    pub fn proxy(&self) -> &ProxyDescriptor {
        &self.proxy
    }

    /// Address of the bound proxy, used as the metrics label.
    pub fn proxy_address(&self) -> &str {
        &self.proxy.address
    }

    /// Split into the client and the bound proxy's address.
    pub fn into_parts(self) -> (ClientWithMiddleware, String) {
        (self.client, self.proxy.address)
    }
}

/// Builds clients that route through a randomly chosen proxy of a pool.
#[derive(Debug, Clone)]
pub struct ProxyClientFactory {
    pool: Arc<ProxyPool>,
}

impl ProxyClientFactory {
    /// Create a factory drawing from the given pool.
    pub fn new(pool: Arc<ProxyPool>) -> Self {
        Self { pool }
    }

    /// The pool proxies are drawn from.
    pub fn pool(&self) -> &ProxyPool {
        &self.pool
    }

    /// Draw one proxy and build a client bound to it with the policy's
    /// retries wired in. No network I/O happens here.
    ///
    /// `request_headers` are also sent to the proxy on the CONNECT handshake.
    /// Unless they carry a `Proxy-Authorization` entry, the descriptor's own
    /// credentials are used if it has any.
    pub fn build(&self, policy: &RetryPolicy, request_headers: &HeaderMap) -> Result<ClientBinding, Error> {
        let proxy = self.pool.select()?;
        let proxy_url = proxy.proxy_url()?;

        let mut reqwest_proxy = reqwest::Proxy::all(proxy_url.as_str())
            .map_err(Error::ClientBuild)?
            .headers(request_headers.clone());
        if !request_headers.contains_key(PROXY_AUTHORIZATION) && proxy.has_credentials() {
            reqwest_proxy = reqwest_proxy.basic_auth(&proxy.username, &proxy.password);
        }

        let client = reqwest::Client::builder()
            .proxy(reqwest_proxy)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::ClientBuild)?;

        debug!("Built client via proxy {} (max retries {})", proxy_url, policy.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryMiddleware::new(policy))
            .build();

        Ok(ClientBinding { client, proxy })
    }
}
