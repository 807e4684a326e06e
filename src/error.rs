//! Error types for the reqwest-proxy-rotator crate.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Error returned when a selection is attempted on a pool with no members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No proxy available in pool")]
pub struct EmptyPool;

/// Context attached by [`RetryMiddleware`](crate::RetryMiddleware) once the
/// retry ceiling is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("giving up after {attempts} attempt(s)")]
pub struct RetriesExhausted {
    /// Total attempts made, the initial one included.
    pub attempts: u32,
    /// Status of the last response, if the last attempt produced one.
    pub last_status: Option<StatusCode>,
}

/// Errors surfaced by pool population, client construction and request execution.
#[derive(Debug, Error)]
pub enum Error {
    #[error("empty API key")]
    EmptyApiKey,

    #[error("invalid provider URL {url}: {source}")]
    InvalidProviderUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("proxy provider unreachable: {0}")]
    ProviderUnreachable(#[source] reqwest::Error),

    #[error("failed to decode proxy list: {0}")]
    ProviderDecode(#[source] reqwest::Error),

    #[error(transparent)]
    EmptyPool(#[from] EmptyPool),

    #[error("invalid proxy URL {url}: {source}")]
    InvalidProxyUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid request URL {url}: {source}")]
    InvalidRequestUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("retry wait bounds are inverted: min {wait_min:?} > max {wait_max:?}")]
    InvalidRetryPolicy {
        wait_min: Duration,
        wait_max: Duration,
    },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error(transparent)]
    Request(#[from] reqwest_middleware::Error),

    #[error("request exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl Error {
    /// Number of attempts made before the retry middleware gave up, if this
    /// error came from an exhausted retry loop.
    pub fn retry_attempts(&self) -> Option<u32> {
        self.retries_exhausted().map(|e| e.attempts)
    }

    /// The [`RetriesExhausted`] context carried by this error, if any.
    pub fn retries_exhausted(&self) -> Option<&RetriesExhausted> {
        match self {
            Error::Request(reqwest_middleware::Error::Middleware(err)) => {
                err.downcast_ref::<RetriesExhausted>()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn retry_attempts_reads_exhaustion_context() {
        let inner = anyhow!("connection refused").context(RetriesExhausted {
            attempts: 3,
            last_status: None,
        });
        let err = Error::Request(reqwest_middleware::Error::Middleware(inner));
        assert_eq!(err.retry_attempts(), Some(3));
        assert!(err.to_string().contains("giving up after 3 attempt(s)"));
    }

    #[test]
    fn retry_attempts_is_none_for_other_errors() {
        assert_eq!(Error::EmptyApiKey.retry_attempts(), None);
        assert_eq!(Error::from(EmptyPool).retry_attempts(), None);
        let plain = Error::Request(reqwest_middleware::Error::Middleware(anyhow!("boom")));
        assert_eq!(plain.retry_attempts(), None);
    }
}
