//! Retry middleware for reqwest.

use crate::config::RetryPolicy;
use crate::error::RetriesExhausted;

use anyhow::anyhow;
use async_trait::async_trait;
use log::debug;
use reqwest_middleware::{Error, Middleware, Next, Result};
use reqwest_retry::{default_on_request_failure, default_on_request_success, Retryable};
use std::time::Duration;

/// Middleware that retries transient failures of a request.
///
/// Connect errors, timeouts, 408, 429 and 5xx responses are retried up to
/// the policy's `max_retries` times, waiting `backoff_step * n` before retry
/// `n`. A request that is still failing afterwards is turned into an error
/// carrying [`RetriesExhausted`].
#[derive(Debug, Clone, Copy)]
pub struct RetryMiddleware {
    policy: RetryPolicy,
}

impl RetryMiddleware {
    /// Create a middleware applying the policy's retry ceiling and linear backoff.
    pub fn new(policy: &RetryPolicy) -> Self {
        Self { policy: *policy }
    }

    /// Retries allowed after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.policy.max_retries
    }

    /// Wait before the given retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.policy.backoff_delay(retry)
    }
}

fn classify(outcome: &Result<reqwest::Response>) -> Option<Retryable> {
    match outcome {
        Ok(response) => default_on_request_success(response),
        Err(err) => default_on_request_failure(err),
    }
}

fn exhausted(outcome: Result<reqwest::Response>, attempts: u32) -> Error {
    match outcome {
        Ok(response) => Error::Middleware(anyhow::Error::new(RetriesExhausted {
            attempts,
            last_status: Some(response.status()),
        })),
        Err(Error::Reqwest(err)) => Error::Middleware(anyhow::Error::new(err).context(RetriesExhausted {
            attempts,
            last_status: None,
        })),
        Err(Error::Middleware(err)) => Error::Middleware(err.context(RetriesExhausted {
            attempts,
            last_status: None,
        })),
    }
}

#[async_trait]
impl Middleware for RetryMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> Result<reqwest::Response> {
        let mut retries = 0;

        loop {
            let attempt = req.try_clone().ok_or_else(|| {
                Error::Middleware(anyhow!(
                    "Request object is not cloneable. Are you passing a streaming body?".to_string()
                ))
            })?;

            let outcome = next.clone().run(attempt, extensions).await;

            if !matches!(classify(&outcome), Some(Retryable::Transient)) {
                return outcome;
            }

            if retries >= self.max_retries() {
                return Err(exhausted(outcome, retries + 1));
            }

            retries += 1;
            let wait = self.delay_for(retries);
            match &outcome {
                Ok(response) => debug!(
                    "{} {} returned {}, retry {}/{} in {:?}",
                    req.method(), req.url(), response.status(), retries, self.max_retries(), wait
                ),
                Err(err) => debug!(
                    "{} {} failed: {}, retry {}/{} in {:?}",
                    req.method(), req.url(), err, retries, self.max_retries(), wait
                ),
            }
            tokio::time::sleep(wait).await;
        }
    }
}
