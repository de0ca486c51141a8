//! Console statistics for a finished crawl

use crate::output::sitemap::CrawlResult;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Total number of pages visited
    pub total_pages: usize,

    /// Pages that loaded and had their links extracted
    pub succeeded: usize,

    /// Pages that failed after every retry
    pub failed: usize,

    /// Count of pages by depth
    pub pages_by_depth: BTreeMap<u32, usize>,

    /// Error message -> number of pages that ended with it
    pub error_summary: BTreeMap<String, usize>,

    /// Seconds spent crawling
    pub duration_secs: f64,
}

impl CrawlStatistics {
    /// Computes statistics for a crawl result
    pub fn from_result(result: &CrawlResult) -> Self {
        let pages_by_depth = result
            .pages
            .iter()
            .map(|(depth, urls)| (*depth, urls.len()))
            .collect();

        let mut error_summary = BTreeMap::new();
        for record in result.failures.values() {
            *error_summary.entry(record.error.clone()).or_insert(0) += 1;
        }

        Self {
            total_pages: result.visited_count,
            succeeded: result.succeeded_count(),
            failed: result.failures.len(),
            pages_by_depth,
            error_summary,
            duration_secs: result.duration.as_secs_f64(),
        }
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total_pages as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `result` - The finished crawl to summarize
pub fn print_statistics(result: &CrawlResult) {
    let stats = CrawlStatistics::from_result(result);

    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Domain: {}", result.domain);
    println!("  Total pages visited: {}", stats.total_pages);
    println!("  Failed pages: {}", stats.failed);
    println!("  Duration: {:.2}s", stats.duration_secs);
    if !result.completed {
        println!("  Crawl was stopped before completion");
    }
    println!();

    println!("Pages by Depth:");
    for (depth, count) in &stats.pages_by_depth {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        println!("  Depth {}: {} ({:.1}%)", depth, count, percentage);
    }
    println!();

    if !stats.error_summary.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.error_summary.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (error, count) in error_counts {
            println!("  {}: {}", error, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully fetched)",
        stats.success_rate(),
        stats.succeeded,
        stats.total_pages
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sitemap::tests::sample_result;

    #[test]
    fn test_statistics_from_result() {
        let stats = CrawlStatistics::from_result(&sample_result());

        assert_eq!(stats.total_pages, 3);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.pages_by_depth.get(&1), Some(&2));
        assert_eq!(stats.error_summary.get("HTTP 500"), Some(&1));
    }

    #[test]
    fn test_success_rate() {
        let stats = CrawlStatistics::from_result(&sample_result());
        assert!((stats.success_rate() - 66.67).abs() < 0.01);
    }

    #[test]
    fn test_success_rate_zero_pages() {
        let mut result = sample_result();
        result.pages.clear();
        result.failures.clear();
        result.visited_count = 0;

        let stats = CrawlStatistics::from_result(&result);
        assert_eq!(stats.success_rate(), 0.0);
    }
}
