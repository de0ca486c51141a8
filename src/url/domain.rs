use url::Url;

/// Extracts the crawl domain (authority) from a URL
///
/// The domain is the lowercase host, followed by `:port` when the URL carries a
/// port that is not the default for its scheme. Two URLs belong to the same
/// crawl only if their domains are exactly equal, so `example.com:8080` and
/// `example.com` are different domains while `https://example.com:443` and
/// `https://example.com` are the same one.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase authority
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemapper::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
