//! Bounded-concurrency fetch dispatcher
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - Per-attempt timeouts around the page fetcher
//! - Retrying failed attempts with an optional backoff delay
//!
//! Every attempt, retries included, holds a semaphore permit for exactly the
//! duration of the fetch. Permits are RAII guards, so a failing or timed-out
//! attempt gives its slot back just like a successful one.

use crate::config::{Config, RetryConfig};
use crate::crawler::fetcher::PageFetcher;
use crate::FetchError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// Result of fetching one URL, after retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page loaded and its links were extracted
    Success {
        /// URL the page was served from after redirects
        final_url: Url,
        /// Raw links, as written on the page
        links: Vec<String>,
    },

    /// Every attempt failed
    Failure {
        /// Description of the last error
        error: String,
        /// Attempts made, including the first
        attempts: u32,
    },
}

/// How often and how patiently a failed fetch is retried
///
/// The delay before retry `n` (1-based) is
/// `initial_backoff * multiplier^(n-1)`, capped at `max_backoff`. A zero
/// `initial_backoff` retries immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts made after the first one fails
    pub max_retries: u32,

    /// Delay before the first retry
    pub initial_backoff: Duration,

    /// Growth factor between consecutive delays
    pub multiplier: f64,

    /// Upper bound for any single delay
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Retries `max_retries` times with no delay
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::ZERO,
            multiplier: 1.0,
            max_backoff: Duration::ZERO,
        }
    }

    /// Builds a policy from the `[retry]` section and a retry count
    pub fn from_config(max_retries: u32, config: &RetryConfig) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            multiplier: config.backoff_multiplier,
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }

    /// Total attempts allowed for one URL
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the given retry (1 = first retry)
    pub fn delay_for(&self, retry: u32) -> Duration {
        if self.initial_backoff.is_zero() || retry == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let factor = self.multiplier.max(1.0).powi(exponent);
        let initial_ms = self.initial_backoff.as_millis() as f64;
        let cap_ms = (self.max_backoff.as_millis() as f64).max(initial_ms);
        let delay_ms = (initial_ms * factor).min(cap_ms);

        if delay_ms.is_finite() && delay_ms > 0.0 {
            Duration::from_millis(delay_ms as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::immediate(2)
    }
}

impl From<&Config> for RetryPolicy {
    fn from(config: &Config) -> Self {
        Self::from_config(config.crawler.max_retries, &config.retry)
    }
}

/// Runs fetches through a shared concurrency limit, retrying failures
pub struct FetchDispatcher {
    fetcher: Arc<dyn PageFetcher>,
    permits: Arc<Semaphore>,
    width: usize,
    policy: RetryPolicy,
    request_timeout: Duration,
}

impl FetchDispatcher {
    /// Creates a dispatcher allowing `width` fetch attempts in flight
    ///
    /// A width of zero is raised to one.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        width: usize,
        policy: RetryPolicy,
        request_timeout: Duration,
    ) -> Self {
        let width = width.max(1);
        Self {
            fetcher,
            permits: Arc::new(Semaphore::new(width)),
            width,
            policy,
            request_timeout,
        }
    }

    /// Maximum number of attempts in flight
    pub fn width(&self) -> usize {
        self.width
    }

    /// Slots not currently held by an attempt
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches `url` and extracts its links, retrying per the policy
    ///
    /// Intermediate failures are logged as warnings; only the outcome after
    /// the last attempt is returned.
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.attempt(url).await {
                Ok((final_url, links)) => {
                    tracing::debug!(
                        "Fetched {} ({} links, attempt {})",
                        url,
                        links.len(),
                        attempt
                    );
                    return FetchOutcome::Success { final_url, links };
                }
                Err(error) if attempt < max_attempts => {
                    tracing::warn!(
                        "Retrying ({}/{}) for {}: {}",
                        attempt,
                        self.policy.max_retries,
                        url,
                        error
                    );

                    // Sleep without holding a permit
                    let delay = self.policy.delay_for(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(error) => {
                    tracing::error!(
                        "Failed to fetch {} after {} attempts: {}",
                        url,
                        attempt,
                        error
                    );
                    return FetchOutcome::Failure {
                        error: error.to_string(),
                        attempts: attempt,
                    };
                }
            }
        }
    }

    /// One load + extract under a permit
    async fn attempt(&self, url: &Url) -> Result<(Url, Vec<String>), FetchError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| FetchError::Closed)?;

        let page = tokio::time::timeout(
            self.request_timeout,
            self.fetcher.load(url, self.request_timeout),
        )
        .await
        .map_err(|_| FetchError::Timeout(self.request_timeout))??;

        let links = self.fetcher.extract_links(&page)?;
        Ok((page.url, links))
    }
}
