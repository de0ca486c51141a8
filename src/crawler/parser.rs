//! HTML parser for extracting links
//!
//! Links are returned exactly as written in the page. Resolving them against
//! the page URL and deciding whether to follow them is the link filter's job.

use scraper::{Html, Selector};

/// Extracts the `href` of every `<a>` element, in document order
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>` (file downloads, not pages)
/// - `<a>` elements without an `href`
///
/// **Note:** `rel="nofollow"` links ARE followed; the sitemap lists every
/// reachable page.
///
/// # Example
///
/// ```
/// use sitemapper::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["/page".to_string()]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_relative_links_unresolved() {
        let html = r#"<html><body><a href="/other">A</a><a href="sub/page">B</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/other", "sub/page"]);
    }

    #[test]
    fn test_non_navigational_links_are_returned_raw() {
        let html = r#"<a href="mailto:a@example.com">Mail</a><a href="javascript:void(0)">JS</a>"#;
        assert_eq!(extract_links(html).len(), 2);
    }

    #[test]
    fn test_skip_download_link() {
        let html = r#"<html><body><a href="/file.pdf" download>Download</a></body></html>"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_skip_anchor_without_href() {
        let html = r#"<html><body><a name="top">Top</a></body></html>"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_follow_nofollow_links() {
        let html = r#"<html><body><a href="/page" rel="nofollow">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/page"]);
    }

    #[test]
    fn test_ignores_other_elements() {
        let html = r#"
            <html>
            <head><link rel="stylesheet" href="/style.css"></head>
            <body>
                <img src="/logo.png">
                <script src="/app.js"></script>
                <a href="/page1">Link 1</a>
            </body>
            </html>
        "#;
        assert_eq!(extract_links(html), vec!["/page1"]);
    }

    #[test]
    fn test_document_order_and_duplicates_kept() {
        let html = r#"<a href="/b">B</a><a href="/a">A</a><a href="/b">B again</a>"#;
        assert_eq!(extract_links(html), vec!["/b", "/a", "/b"]);
    }

    #[test]
    fn test_malformed_html() {
        let html = r#"<html><body><a href="/ok">unclosed <div><a href="/also-ok">"#;
        assert_eq!(extract_links(html), vec!["/ok", "/also-ok"]);
    }
}
