//! Proxy descriptors as published by the proxy-list provider.

use serde::Deserialize;
use url::Url;

use crate::error::Error;

/// One forward-proxy endpoint and its metadata.
///
/// Field names on the wire follow the provider's JSON schema. The port is kept
/// as the provider sends it (a string) and only validated when a proxy URL is
/// built from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProxyDescriptor {
    /// Host name or IP address of the proxy.
    #[serde(rename = "proxy_ip")]
    pub address: String,
    #[serde(rename = "proxy_port")]
    pub port: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Free-form status reported by the provider, e.g. "online".
    #[serde(rename = "proxy_status", default)]
    pub status: String,
    #[serde(rename = "proxy_country", default)]
    pub country: String,
    #[serde(rename = "proxy_area", default)]
    pub region: String,
    #[serde(rename = "proxy_location", default)]
    pub city: String,
}

impl ProxyDescriptor {
    /// Create a descriptor for `address:port` with no credentials or location.
    pub fn new(address: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: port.into(),
            ..Self::default()
        }
    }

    /// Set the status reported for this proxy.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the credentials used to authenticate with this proxy.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the location metadata.
    pub fn with_location(
        mut self,
        country: impl Into<String>,
        region: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        self.country = country.into();
        self.region = region.into();
        self.city = city.into();
        self
    }

    /// Build the `http://address:port` URL traffic is routed through.
    ///
    /// The port must be a plain decimal `u16` and the address a bare host;
    /// anything that would parse into a path, query, fragment or userinfo is
    /// rejected rather than silently routed through the default port.
    pub fn proxy_url(&self) -> Result<Url, Error> {
        let raw = format!("http://{}:{}", self.address, self.port);
        let invalid = |source| Error::InvalidProxyUrl {
            url: raw.clone(),
            source,
        };

        // u16::from_str alone would accept a leading '+'.
        let numeric = !self.port.is_empty() && self.port.bytes().all(|b| b.is_ascii_digit());
        if !numeric || self.port.parse::<u16>().is_err() {
            return Err(invalid(url::ParseError::InvalidPort));
        }

        let url = Url::parse(&raw).map_err(invalid)?;
        if url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
            || !url.username().is_empty()
            || url.password().is_some()
        {
            return Err(invalid(url::ParseError::InvalidDomainCharacter));
        }

        Ok(url)
    }

    /// Whether the provider supplied a username for this proxy.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_provider_schema() {
        let json = r#"{
            "proxy_ip": "10.0.0.7",
            "proxy_port": "3128",
            "username": "user",
            "password": "secret",
            "proxy_status": "online",
            "proxy_country": "GB",
            "proxy_area": "England",
            "proxy_location": "London"
        }"#;

        let proxy: ProxyDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(
            proxy,
            ProxyDescriptor::new("10.0.0.7", "3128")
                .with_credentials("user", "secret")
                .with_status("online")
                .with_location("GB", "England", "London")
        );
    }

    #[test]
    fn proxy_url_uses_http_scheme() {
        let url = ProxyDescriptor::new("127.0.0.1", "8080").proxy_url().unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = ProxyDescriptor::new("127.0.0.1", "eighty").proxy_url().unwrap_err();
        match err {
            Error::InvalidProxyUrl { url, source } => {
                assert_eq!(url, "http://127.0.0.1:eighty");
                assert_eq!(source, url::ParseError::InvalidPort);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_or_out_of_range_port_is_rejected() {
        for port in ["", "65536", "-1", "+80", " 80"] {
            let err = ProxyDescriptor::new("127.0.0.1", port).proxy_url().unwrap_err();
            match err {
                Error::InvalidProxyUrl { source, .. } => assert_eq!(source, url::ParseError::InvalidPort, "port {port:?}"),
                other => panic!("unexpected error for port {port:?}: {other}"),
            }
        }
    }

    #[test]
    fn address_with_path_or_userinfo_is_rejected() {
        for address in ["10.0.0.1/x", "10.0.0.1?q=1", "10.0.0.1#frag", "user@10.0.0.1"] {
            let err = ProxyDescriptor::new(address, "8080").proxy_url().unwrap_err();
            assert!(matches!(err, Error::InvalidProxyUrl { .. }), "address {address:?}: {err}");
        }
    }

    #[test]
    fn default_port_is_accepted() {
        let url = ProxyDescriptor::new("10.0.0.1", "80").proxy_url().unwrap();
        assert_eq!(url.port_or_known_default(), Some(80));
    }

    #[test]
    fn empty_address_is_rejected() {
        let err = ProxyDescriptor::new("", "8080").proxy_url().unwrap_err();
        assert!(matches!(err, Error::InvalidProxyUrl { .. }));
    }

    #[test]
    fn credentials_are_optional() {
        assert!(!ProxyDescriptor::new("10.0.0.1", "80").has_credentials());
        assert!(ProxyDescriptor::new("10.0.0.1", "80")
            .with_credentials("u", "p")
            .has_credentials());
    }
}
