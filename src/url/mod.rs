//! URL handling module for Sitemapper
//!
//! This module provides start-URL validation, link resolution, crawl-domain
//! extraction, and the link filter that decides which discovered links may
//! enter the frontier.

mod domain;
mod normalize;

use crate::{UrlError, UrlResult};
use std::collections::HashSet;
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::{normalize_extension, path_extension, resolve_link};

/// File extensions skipped when no exclusion list is configured
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &["pdf", "jpg", "png", "zip"];

/// Validates the URL a crawl starts from
///
/// The start URL must parse on its own (no base to resolve against), use HTTP
/// or HTTPS, and name a host. The fragment is dropped.
///
/// # Examples
///
/// ```
/// use sitemapper::url::parse_start_url;
///
/// assert!(parse_start_url("https://example.com/").is_ok());
/// assert!(parse_start_url("example.com").is_err());
/// assert!(parse_start_url("ftp://example.com/").is_err());
/// ```
pub fn parse_start_url(raw: &str) -> UrlResult<Url> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    normalize::ensure_http(&url)?;

    url.set_fragment(None);
    Ok(url)
}

/// Screens discovered links for a single-domain crawl
///
/// A link passes when it resolves to an HTTP(S) URL whose domain is exactly
/// the crawl domain and whose path does not end in an excluded extension.
/// The filter holds no mutable state and can be shared freely between tasks.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    domain: String,
    excluded_extensions: HashSet<String>,
}

impl LinkFilter {
    /// Creates a filter for `domain` skipping the given extensions
    ///
    /// Extensions are matched case-insensitively and may be given with or
    /// without a leading dot.
    pub fn new<I, S>(domain: impl Into<String>, excluded_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded_extensions = excluded_extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();

        Self {
            domain: domain.into().to_lowercase(),
            excluded_extensions,
        }
    }

    /// Creates a filter using [`DEFAULT_EXCLUDED_EXTENSIONS`]
    pub fn with_default_exclusions(domain: impl Into<String>) -> Self {
        Self::new(domain, DEFAULT_EXCLUDED_EXTENSIONS.iter().copied())
    }

    /// The domain this filter accepts
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Resolves `raw` against `base` and checks it against the crawl rules
    ///
    /// # Arguments
    ///
    /// * `base` - The page the link was found on
    /// * `raw` - The link as extracted from the page
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - An absolute, in-domain URL that may be crawled
    /// * `Err(UrlError)` - Why the link was rejected
    pub fn resolve(&self, base: &Url, raw: &str) -> UrlResult<Url> {
        let url = resolve_link(base, raw)?;
        self.check(&url)?;
        Ok(url)
    }

    /// Checks an already absolute URL against the domain and extension rules
    pub fn check(&self, url: &Url) -> UrlResult<()> {
        let found = extract_domain(url).ok_or(UrlError::MissingDomain)?;
        if found != self.domain {
            return Err(UrlError::OffDomain {
                expected: self.domain.clone(),
                found,
            });
        }

        if let Some(extension) = path_extension(url) {
            if self.excluded_extensions.contains(&extension) {
                return Err(UrlError::ExcludedExtension(extension));
            }
        }

        Ok(())
    }
}
