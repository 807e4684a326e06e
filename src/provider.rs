//! Population of a proxy pool from the proxy-list provider.

use crate::config::ProviderConfig;
use crate::error::Error;
use crate::metrics::MetricsRecorder;
use crate::pool::ProxyPool;
use crate::proxy::ProxyDescriptor;

use log::info;
use reqwest::Client;
use url::Url;

/// Build the provider URL `<base>/full/showLocation/<key>`.
pub(crate) fn provider_url(base_url: &str, api_key: &str) -> Result<Url, Error> {
    let invalid = |source| Error::InvalidProviderUrl {
        url: base_url.to_string(),
        source,
    };

    let mut url = Url::parse(base_url).map_err(invalid)?;
    url.path_segments_mut()
        .map_err(|()| invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(["full", "showLocation", api_key]);
    Ok(url)
}

/// Fetch the provider's proxy list into a new pool.
///
/// An empty key is rejected before any request is made. The pool is only
/// returned, and its inventory only counted, if the whole list decodes.
pub async fn fetch_pool(config: &ProviderConfig, api_key: &str, metrics: &MetricsRecorder) -> Result<ProxyPool, Error> {
    if api_key.trim().is_empty() {
        return Err(Error::EmptyApiKey);
    }

    let url = provider_url(&config.base_url, api_key)?;
    let client = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(Error::ClientBuild)?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(Error::ProviderUnreachable)?;

    let proxies: Vec<ProxyDescriptor> = response.json().await.map_err(|e| {
        if e.is_decode() {
            Error::ProviderDecode(e)
        } else {
            Error::ProviderUnreachable(e)
        }
    })?;

    info!("Fetched {} proxies from provider {}", proxies.len(), config.base_url);
    metrics.record_pool_load(&proxies);

    Ok(ProxyPool::new(proxies))
}
