//! HTML sitemap generation
//!
//! Writes a standalone HTML page listing every visited URL grouped by depth,
//! followed by the pages that could not be fetched.

use crate::output::sitemap::CrawlResult;
use crate::output::traits::{OutputResult, SitemapReport};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; -webkit-font-smoothing: antialiased; }
        h1 { color: #333; border-bottom: 1px solid #eee; padding-bottom: 10px; }
        .depth { margin-left: 20px; margin-bottom: 20px; }
        .url { margin: 5px 0; color: #0066cc; word-break: break-all; }
        .stats { padding: 10px; background: #f5f5f5; border-radius: 5px; margin-bottom: 20px; }
        .error { color: #d9534f; }
";

/// Renders a crawl as an HTML file
#[derive(Debug, Clone)]
pub struct HtmlReport {
    path: PathBuf,
}

impl HtmlReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SitemapReport for HtmlReport {
    fn render(&self, result: &CrawlResult) -> OutputResult<()> {
        let html = format_html(result);

        let mut file = File::create(&self.path)?;
        file.write_all(html.as_bytes())?;

        tracing::info!("Sitemap generated successfully: {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

/// Formats a crawl result as an HTML document
///
/// URLs and error messages are entity-encoded.
pub fn format_html(result: &CrawlResult) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("    <meta charset=\"utf-8\">\n");
    html.push_str("    <title>Website Sitemap</title>\n");
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n");

    html.push_str(&format!(
        "    <h1>Sitemap for {}</h1>\n",
        encode_text(&result.domain)
    ));
    html.push_str("    <div class=\"stats\">\n");
    html.push_str(&format!(
        "        <p>Generated on: {}</p>\n",
        result.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    html.push_str(&format!(
        "        <p>Total URLs: {}</p>\n",
        result.visited_count
    ));
    html.push_str(&format!("        <p>Max Depth: {}</p>\n", result.max_depth));
    if !result.completed {
        html.push_str("        <p class=\"error\">Crawl stopped before completion</p>\n");
    }
    html.push_str("    </div>\n");

    for (depth, urls) in &result.pages {
        html.push_str(&format!(
            "    <h2>Depth {} ({} URLs)</h2>\n",
            depth,
            urls.len()
        ));
        html.push_str("    <div class=\"depth\">\n");
        for url in urls {
            html.push_str(&format!(
                "        <div class=\"url\"><a href=\"{}\" target=\"_blank\">{}</a></div>\n",
                encode_double_quoted_attribute(url),
                encode_text(url)
            ));
        }
        html.push_str("    </div>\n");
    }

    if !result.failures.is_empty() {
        html.push_str("    <h2 class=\"error\">Failed URLs</h2>\n");
        html.push_str("    <div class=\"depth\">\n");
        for (url, record) in &result.failures {
            html.push_str(&format!(
                "        <div class=\"url error\">{} - {}</div>\n",
                encode_text(url),
                encode_text(&record.error)
            ));
        }
        html.push_str("    </div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
