//! Page fetching capability
//!
//! The crawler never talks to the network directly. It goes through the
//! [`PageFetcher`] trait, which loads a page and extracts its raw links. This
//! module also provides the HTTP implementation used by the binary:
//! - Building HTTP clients with the configured user agent string
//! - GET requests with a per-attempt timeout
//! - Status and Content-Type classification
//! - Link extraction through the HTML parser

use crate::config::UserAgentConfig;
use crate::crawler::parser::extract_links;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A loaded page
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects; relative links resolve against it
    pub url: Url,

    /// Page body
    pub body: String,
}

/// Loads pages and extracts their outbound links
///
/// Implementations must be safe to call from many tasks at once. They do not
/// need to limit their own concurrency or retry: the dispatcher does both.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Loads `url`, giving up after `timeout`
    async fn load(&self, url: &Url, timeout: Duration) -> Result<Page, FetchError>;

    /// Returns every hyperlink on the page, exactly as written, in page order
    fn extract_links(&self, page: &Page) -> Result<Vec<String>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sitemapper::config::UserAgentConfig;
/// use sitemapper::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by reqwest and the HTML link parser
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    /// Fetches a page with a single GET request
    ///
    /// # Error Classification
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Request exceeded `timeout` | `Timeout` |
    /// | Connection/TLS/redirect failure | `Http` |
    /// | Non-2xx status | `Status` |
    /// | Content-Type present but not HTML | `NotHtml` |
    ///
    /// Every one of these is retried by the dispatcher.
    async fn load(&self, url: &Url, timeout: Duration) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(timeout)
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // A missing header is accepted; plenty of small servers omit it
        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(FetchError::NotHtml(content_type.to_string()));
            }
        }

        let final_url = response.url().clone();
        let body = response.text().await?;

        Ok(Page {
            url: final_url,
            body,
        })
    }

    fn extract_links(&self, page: &Page) -> Result<Vec<String>, FetchError> {
        Ok(extract_links(&page.body))
    }
}

/// Returns true for HTML and XHTML content types
fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
