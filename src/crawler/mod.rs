//! Crawler module for breadth-first site discovery
//!
//! This module contains the core crawling logic, including:
//! - Page loading behind the `PageFetcher` trait, with an HTTP implementation
//! - HTML link extraction
//! - The frontier of admitted URLs, partitioned by depth
//! - Bounded-concurrency fetch dispatch with retry
//! - Level-synchronized crawl coordination and failure recording

mod coordinator;
mod dispatcher;
mod failures;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{Coordinator, CrawlPhase, LevelSummary, StopHandle};
pub use dispatcher::{FetchDispatcher, FetchOutcome, RetryPolicy};
pub use failures::{FailureLog, FailureRecord};
pub use fetcher::{build_http_client, HttpPageFetcher, Page, PageFetcher};
pub use frontier::{CrawlTarget, Frontier};
pub use parser::extract_links;

pub use crate::output::CrawlResult;

use crate::config::Config;
use crate::url::DEFAULT_EXCLUDED_EXTENSIONS;
use crate::SitemapError;
use std::sync::Arc;
use std::time::Duration;

/// Settings for a single crawl
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Maximum number of link hops from the start URL
    pub max_depth: u32,

    /// Maximum number of fetch attempts in flight
    pub concurrency_limit: usize,

    /// Retry count and backoff
    pub retry: RetryPolicy,

    /// Path extensions that are never crawled
    pub excluded_extensions: Vec<String>,

    /// Time allowed for one fetch attempt
    pub request_timeout: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            concurrency_limit: 5,
            retry: RetryPolicy::default(),
            excluded_extensions: DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Config> for CrawlOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_depth: config.crawler.max_depth,
            concurrency_limit: config.crawler.max_concurrency as usize,
            retry: RetryPolicy::from(config),
            excluded_extensions: config.crawler.excluded_extensions.clone(),
            request_timeout: config.crawler.request_timeout(),
        }
    }
}

/// Crawls a site breadth-first and returns its sitemap
///
/// # Arguments
///
/// * `start_url` - Absolute HTTP(S) URL the crawl starts from
/// * `options` - Depth, concurrency, retry and filtering settings
/// * `fetcher` - The page loading capability
///
/// # Returns
///
/// * `Ok(CrawlResult)` - The crawl ran; individual page failures are listed
///   in the result
/// * `Err(SitemapError::InvalidInput)` - The start URL or options were
///   rejected before anything was fetched
pub async fn crawl(
    start_url: &str,
    options: CrawlOptions,
    fetcher: Arc<dyn PageFetcher>,
) -> Result<CrawlResult, SitemapError> {
    let mut coordinator = Coordinator::new(start_url, options, fetcher)?;
    Ok(coordinator.run().await)
}

/// Crawls a site using an HTTP fetcher built from configuration
pub async fn crawl_with_config(
    start_url: &str,
    config: &Config,
) -> Result<CrawlResult, SitemapError> {
    let fetcher = HttpPageFetcher::new(&config.user_agent)?;
    crawl(start_url, CrawlOptions::from(config), Arc::new(fetcher)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.crawler.max_depth = 1;
        config.crawler.max_concurrency = 8;
        config.crawler.max_retries = 4;
        config.crawler.request_timeout_ms = 1_500;
        config.crawler.excluded_extensions = vec!["gif".to_string()];
        config.retry = RetryConfig {
            initial_backoff_ms: 100,
            backoff_multiplier: 3.0,
            max_backoff_ms: 1_000,
        };

        let options = CrawlOptions::from(&config);

        assert_eq!(options.max_depth, 1);
        assert_eq!(options.concurrency_limit, 8);
        assert_eq!(options.retry.max_retries, 4);
        assert_eq!(options.retry.initial_backoff, Duration::from_millis(100));
        assert_eq!(options.request_timeout, Duration::from_millis(1_500));
        assert_eq!(options.excluded_extensions, vec!["gif"]);
    }

    #[test]
    fn test_default_options_match_default_config() {
        let from_config = CrawlOptions::from(&Config::default());
        let defaults = CrawlOptions::default();

        assert_eq!(from_config.max_depth, defaults.max_depth);
        assert_eq!(from_config.concurrency_limit, defaults.concurrency_limit);
        assert_eq!(from_config.retry.max_retries, defaults.retry.max_retries);
        assert_eq!(from_config.retry.delay_for(1), Duration::ZERO);
        assert_eq!(from_config.excluded_extensions, defaults.excluded_extensions);
        assert_eq!(from_config.request_timeout, defaults.request_timeout);
    }

    #[tokio::test]
    async fn test_crawl_rejects_bad_start_url() {
        let fetcher: Arc<dyn PageFetcher> =
            Arc::new(HttpPageFetcher::with_client(reqwest::Client::new()));
        let result = crawl("not a url", CrawlOptions::default(), fetcher).await;
        assert!(matches!(result, Err(SitemapError::InvalidInput(_))));
    }
}
