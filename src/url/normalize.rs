use crate::UrlError;
use url::Url;

/// Link prefixes that never lead to another page
const NON_NAVIGATIONAL_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a raw link against the page it was found on
///
/// # Resolution Steps
///
/// 1. Trim whitespace; reject empty links
/// 2. Reject non-navigational links (`javascript:`, `mailto:`, `tel:`, `data:`)
///    and fragment-only anchors (`#section`)
/// 3. Join the link onto the base URL; reject if the result does not parse
/// 4. Reject anything that is not HTTP(S) or has no host
/// 5. Drop the fragment so `/page#a` and `/page` are the same page
///
/// # Arguments
///
/// * `base` - The URL of the page the link was extracted from
/// * `raw` - The link exactly as it appeared on the page
///
/// # Returns
///
/// * `Ok(Url)` - Absolute URL
/// * `Err(UrlError)` - The link cannot be followed
///
/// # Examples
///
/// ```
/// use sitemapper::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let url = resolve_link(&base, "../about#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn resolve_link(base: &Url, raw: &str) -> Result<Url, UrlError> {
    let href = raw.trim();

    if href.is_empty() {
        return Err(UrlError::NotNavigational("empty link".to_string()));
    }

    let lowered = href.to_ascii_lowercase();
    if href.starts_with('#')
        || NON_NAVIGATIONAL_PREFIXES
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
    {
        return Err(UrlError::NotNavigational(href.to_string()));
    }

    let mut url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    ensure_http(&url)?;

    url.set_fragment(None);
    Ok(url)
}

/// Checks that a URL is HTTP(S) and has a host
pub(crate) fn ensure_http(url: &Url) -> Result<(), UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(())
}

/// Returns the lowercase extension of the last path segment, if any
///
/// Only the path is considered, so `/report.pdf?download=1` has the extension
/// `pdf` while `/files?name=report.pdf` has none.
pub fn path_extension(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.last()?;
    let (_, extension) = segment.rsplit_once('.')?;

    if extension.is_empty() {
        None
    } else {
        Some(extension.to_ascii_lowercase())
    }
}

/// Normalizes a configured extension: trimmed, lowercase, no leading dot
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}
