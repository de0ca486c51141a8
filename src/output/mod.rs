//! Output module for sitemap results and reports
//!
//! This module handles:
//! - Aggregating crawl state into a `CrawlResult`
//! - Rendering sitemaps as HTML or Markdown
//! - Printing crawl statistics

mod html;
mod markdown;
pub mod sitemap;
pub mod stats;
mod traits;

pub use html::{format_html, HtmlReport};
pub use markdown::{format_markdown, MarkdownReport};
pub use sitemap::{CrawlResult, SitemapAggregator};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, SitemapReport};

use crate::config::OutputFormat;
use std::path::Path;

/// Creates the report for a configured output format
pub fn report_for(format: OutputFormat, path: &Path) -> Box<dyn SitemapReport> {
    match format {
        OutputFormat::Html => Box::new(HtmlReport::new(path)),
        OutputFormat::Markdown => Box::new(MarkdownReport::new(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_for_format() {
        let path = Path::new("out");
        assert_eq!(report_for(OutputFormat::Html, path).name(), "html");
        assert_eq!(report_for(OutputFormat::Markdown, path).name(), "markdown");
    }
}
