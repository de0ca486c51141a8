//! Sitemap aggregation
//!
//! Turns the frontier's visited set and the failure log into the immutable
//! [`CrawlResult`] handed to reports.

use crate::crawler::{FailureLog, FailureRecord, Frontier};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// The finished sitemap of one crawl
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// Authority the crawl was restricted to
    pub domain: String,

    /// URL the crawl started from
    pub start_url: String,

    /// Configured depth bound
    pub max_depth: u32,

    /// Every admitted URL grouped by the depth it was first reached at,
    /// sorted within each depth
    pub pages: BTreeMap<u32, Vec<String>>,

    /// Pages that failed after every retry, keyed by URL
    pub failures: BTreeMap<String, FailureRecord>,

    /// Number of distinct URLs admitted
    pub visited_count: usize,

    /// When the result was produced
    pub generated_at: DateTime<Utc>,

    /// Wall-clock time spent crawling
    pub duration: Duration,

    /// False if the crawl was stopped before the frontier ran dry
    pub completed: bool,
}

impl CrawlResult {
    /// Depth `url` was recorded at, if it was visited
    pub fn depth_of(&self, url: &str) -> Option<u32> {
        self.pages
            .iter()
            .find(|(_, urls)| urls.binary_search_by(|u| u.as_str().cmp(url)).is_ok())
            .map(|(depth, _)| *depth)
    }

    /// Number of visited pages that did not end in a terminal failure
    pub fn succeeded_count(&self) -> usize {
        self.visited_count.saturating_sub(self.failures.len())
    }

    /// Deepest level that has at least one page
    pub fn deepest_level(&self) -> Option<u32> {
        self.pages.keys().next_back().copied()
    }
}

/// Collects crawl state into a [`CrawlResult`]
#[derive(Debug, Clone)]
pub struct SitemapAggregator {
    domain: String,
    start_url: String,
    max_depth: u32,
}

impl SitemapAggregator {
    pub fn new(domain: &str, start_url: &Url, max_depth: u32) -> Self {
        Self {
            domain: domain.to_string(),
            start_url: start_url.to_string(),
            max_depth,
        }
    }

    /// Builds the result from the final frontier and failure log
    ///
    /// Failed pages stay in their depth group and are repeated in the
    /// failure map.
    pub fn finish(
        self,
        frontier: &Frontier,
        failures: &FailureLog,
        duration: Duration,
        completed: bool,
    ) -> CrawlResult {
        let pages = frontier.visited_by_depth();
        let visited_count = pages.values().map(Vec::len).sum();

        CrawlResult {
            domain: self.domain,
            start_url: self.start_url,
            max_depth: self.max_depth,
            pages,
            failures: failures.snapshot(),
            visited_count,
            generated_at: Utc::now(),
            duration,
            completed,
        }
    }
}
