//! Crawler coordinator - level-synchronized breadth-first crawl
//!
//! The coordinator owns the depth counter and drives the crawl one depth level
//! at a time:
//! - Seeding: validate the start URL, record the domain, admit depth 0
//! - Level d: drain the frontier level, fetch every target concurrently,
//!   admit in-domain links at d + 1, log terminal failures
//! - Barrier: level d + 1 starts only after every fetch of level d, retries
//!   included, has resolved
//! - Done: aggregate the frontier and failure log into a [`CrawlResult`]
//!
//! The barrier is what makes recorded depths shortest-path depths: every link
//! found at depth d is admitted before any depth d + 1 page is fetched, so a
//! URL can never be admitted deeper than its closest discovery.

use crate::crawler::dispatcher::{FetchDispatcher, FetchOutcome};
use crate::crawler::failures::{FailureLog, FailureRecord};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::CrawlOptions;
use crate::output::{CrawlResult, SitemapAggregator};
use crate::url::{extract_domain, parse_start_url, LinkFilter};
use crate::SitemapError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Where the coordinator is in its crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Start URL not yet admitted
    Seeding,
    /// Fetching the given depth
    LevelActive(u32),
    /// Crawl finished; the result has been produced
    Done,
}

/// Asks a running crawl to stop at the next level boundary
///
/// Fetches already running for the current level are allowed to finish, so
/// the partial result still has correct depths.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// State touched by concurrent fetch tasks
struct CrawlShared {
    dispatcher: FetchDispatcher,
    frontier: Frontier,
    failures: FailureLog,
    filter: LinkFilter,
}

/// Per-target report returned by a fetch task
struct TargetReport {
    url: String,
    links_found: usize,
    admitted: usize,
    failed: bool,
}

/// Totals for one finished level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelSummary {
    pub depth: u32,
    pub fetched: usize,
    pub failed: usize,
    pub links_found: usize,
    pub admitted: usize,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    shared: Arc<CrawlShared>,
    start_url: Url,
    domain: String,
    max_depth: u32,
    phase: CrawlPhase,
    stop: StopHandle,
    levels: Vec<LevelSummary>,
}

impl Coordinator {
    /// Creates a coordinator and seeds it with the start URL
    ///
    /// # Arguments
    ///
    /// * `start_url` - Absolute HTTP(S) URL the crawl starts from
    /// * `options` - Depth, concurrency, retry and filtering settings
    /// * `fetcher` - The page loading capability
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Seeded and ready to run
    /// * `Err(SitemapError::InvalidInput)` - Malformed start URL or options;
    ///   nothing has been fetched
    pub fn new(
        start_url: &str,
        options: CrawlOptions,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, SitemapError> {
        if options.concurrency_limit == 0 {
            return Err(SitemapError::InvalidInput(
                "concurrency limit must be at least 1".to_string(),
            ));
        }

        let start_url = parse_start_url(start_url)
            .map_err(|e| SitemapError::InvalidInput(format!("start URL {}: {}", start_url, e)))?;
        let domain = extract_domain(&start_url).ok_or_else(|| {
            SitemapError::InvalidInput(format!("start URL {} has no host", start_url))
        })?;

        let shared = Arc::new(CrawlShared {
            dispatcher: FetchDispatcher::new(
                fetcher,
                options.concurrency_limit,
                options.retry,
                options.request_timeout,
            ),
            frontier: Frontier::new(options.max_depth),
            failures: FailureLog::new(),
            filter: LinkFilter::new(domain.clone(), &options.excluded_extensions),
        });

        let mut coordinator = Self {
            shared,
            start_url,
            domain,
            max_depth: options.max_depth,
            phase: CrawlPhase::Seeding,
            stop: StopHandle::default(),
            levels: Vec::new(),
        };
        coordinator.seed();

        Ok(coordinator)
    }

    /// Admits the start URL at depth 0
    ///
    /// The start URL is admitted even if its extension is excluded; the
    /// caller asked for it explicitly.
    fn seed(&mut self) {
        self.shared.frontier.admit(&self.start_url, 0);
        tracing::info!(
            "Seeded crawl of {} (domain {}, max depth {})",
            self.start_url,
            self.domain,
            self.max_depth
        );
        self.phase = CrawlPhase::LevelActive(0);
    }

    /// Returns a handle that stops the crawl between levels
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn frontier(&self) -> &Frontier {
        &self.shared.frontier
    }

    pub fn failures(&self) -> &FailureLog {
        &self.shared.failures
    }

    /// Summaries of the levels processed so far
    pub fn levels(&self) -> &[LevelSummary] {
        &self.levels
    }

    /// Runs the crawl to completion and returns the sitemap
    ///
    /// Individual page failures never abort the crawl; they end up in the
    /// result's failure map.
    pub async fn run(&mut self) -> CrawlResult {
        let start_time = Instant::now();
        let mut completed = true;

        while let CrawlPhase::LevelActive(depth) = self.phase {
            if self.stop.is_stopped() {
                let dropped = self.shared.frontier.discard_pending();
                tracing::info!(
                    "Crawl stopped before depth {} ({} queued URLs dropped)",
                    depth,
                    dropped
                );
                completed = false;
                break;
            }

            let level = self.shared.frontier.drain_level(depth);
            if level.is_empty() {
                break;
            }

            let summary = self.run_level(depth, level).await;
            tracing::info!(
                "Depth {} complete: {} fetched, {} failed, {} links found, {} new URLs ({} queued)",
                summary.depth,
                summary.fetched,
                summary.failed,
                summary.links_found,
                summary.admitted,
                self.shared.frontier.pending()
            );
            self.levels.push(summary);

            let next = depth + 1;
            if next > self.max_depth || !self.shared.frontier.has_more(next) {
                break;
            }
            self.phase = CrawlPhase::LevelActive(next);
        }

        self.phase = CrawlPhase::Done;

        let result = SitemapAggregator::new(&self.domain, &self.start_url, self.max_depth)
            .finish(
                &self.shared.frontier,
                &self.shared.failures,
                start_time.elapsed(),
                completed,
            );

        tracing::info!(
            "Crawl completed: {} URLs visited, {} failed in {:?}",
            result.visited_count,
            result.failures.len(),
            result.duration
        );

        result
    }

    /// Fetches one level and waits for all of it
    async fn run_level(&self, depth: u32, level: Vec<CrawlTarget>) -> LevelSummary {
        tracing::info!("Crawling depth {} ({} URLs)", depth, level.len());

        let mut outstanding: HashSet<String> = HashSet::with_capacity(level.len());
        let mut tasks = JoinSet::new();

        for target in level {
            outstanding.insert(target.url.to_string());
            let shared = Arc::clone(&self.shared);
            let max_depth = self.max_depth;
            tasks.spawn(async move { process_target(&shared, target, max_depth).await });
        }

        let mut summary = LevelSummary {
            depth,
            ..LevelSummary::default()
        };

        // Barrier: drain every task before returning
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => {
                    outstanding.remove(&report.url);
                    summary.fetched += 1;
                    summary.links_found += report.links_found;
                    summary.admitted += report.admitted;
                    if report.failed {
                        summary.failed += 1;
                    }
                }
                Err(e) => {
                    tracing::error!("Fetch task at depth {} aborted: {}", depth, e);
                }
            }
        }

        // Targets whose task panicked never reported back
        for url in outstanding {
            let recorded = self.shared.failures.record(FailureRecord {
                url,
                error: "fetch task panicked".to_string(),
                attempts: 0,
                depth,
            });
            if recorded {
                summary.fetched += 1;
                summary.failed += 1;
            }
        }

        summary
    }
}

/// Fetches one target and feeds the outcome back into the shared state
async fn process_target(shared: &CrawlShared, target: CrawlTarget, max_depth: u32) -> TargetReport {
    let url = target.url.to_string();

    match shared.dispatcher.fetch(&target.url).await {
        FetchOutcome::Success { final_url, links } => {
            let next_depth = target.depth + 1;
            let mut admitted = 0;

            if next_depth <= max_depth {
                for raw in &links {
                    match shared.filter.resolve(&final_url, raw) {
                        Ok(link) => {
                            if shared.frontier.admit(&link, next_depth) {
                                tracing::debug!("Admitted {} at depth {}", link, next_depth);
                                admitted += 1;
                            }
                        }
                        Err(e) => {
                            tracing::debug!("Skipping link {:?} on {}: {}", raw, final_url, e);
                        }
                    }
                }
            }

            TargetReport {
                url,
                links_found: links.len(),
                admitted,
                failed: false,
            }
        }
        FetchOutcome::Failure { error, attempts } => {
            shared.failures.record(FailureRecord {
                url: url.clone(),
                error,
                attempts,
                depth: target.depth,
            });

            TargetReport {
                url,
                links_found: 0,
                admitted: 0,
                failed: true,
            }
        }
    }
}
