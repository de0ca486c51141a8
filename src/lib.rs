//! Sitemapper: a bounded-concurrency sitemap crawler
//!
//! This crate discovers every in-domain page reachable from a start URL within a
//! configured number of link hops, crawling breadth-first one depth level at a
//! time, and produces a depth-grouped sitemap together with the pages that could
//! not be fetched.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Sitemapper operations
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
///
/// Every rejected link maps to one of these; the crawler logs them at debug
/// level and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Non-navigational link: {0}")]
    NotNavigational(String),

    #[error("Link leaves crawl domain {expected}: {found}")]
    OffDomain { expected: String, found: String },

    #[error("Excluded file extension: {0}")]
    ExcludedExtension(String),
}

/// Errors a single fetch attempt can produce
///
/// These are transient from the crawler's point of view: the dispatcher
/// retries them and only the last one survives into a failure record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Expected HTML, got {0}")]
    NotHtml(String),

    #[error("Link extraction failed: {0}")]
    Extraction(String),

    #[error("Fetch dispatcher is closed")]
    Closed,
}

/// Result type alias for Sitemapper operations
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, crawl_with_config, CrawlOptions, PageFetcher, StopHandle};
pub use output::{CrawlResult, SitemapReport};
pub use url::{extract_domain, parse_start_url, LinkFilter};
