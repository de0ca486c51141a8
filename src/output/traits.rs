//! Report traits and types
//!
//! This module defines the trait interface for sitemap reports and the
//! errors they can produce.

use crate::output::sitemap::CrawlResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for sitemap reports
///
/// A report consumes a finished crawl and writes it somewhere. The crawler
/// never depends on any particular report.
pub trait SitemapReport {
    /// Renders the crawl result
    ///
    /// # Arguments
    ///
    /// * `result` - The finished crawl
    fn render(&self, result: &CrawlResult) -> OutputResult<()>;

    /// Short name used in log messages
    fn name(&self) -> &'static str;
}
