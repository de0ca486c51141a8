//! Markdown sitemap generation
//!
//! Same content as the HTML sitemap, laid out as Markdown tables for reading
//! in a terminal or a repository.

use crate::output::sitemap::CrawlResult;
use crate::output::traits::{OutputResult, SitemapReport};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Renders a crawl as a Markdown file
#[derive(Debug, Clone)]
pub struct MarkdownReport {
    path: PathBuf,
}

impl MarkdownReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SitemapReport for MarkdownReport {
    fn render(&self, result: &CrawlResult) -> OutputResult<()> {
        let markdown = format_markdown(result);

        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;

        tracing::info!("Sitemap generated successfully: {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "markdown"
    }
}

/// Formats a crawl result as markdown
///
/// # Arguments
///
/// * `result` - The finished crawl
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown(result: &CrawlResult) -> String {
    let mut md = String::new();

    // Title
    md.push_str(&format!("# Sitemap for {}\n\n", result.domain));

    // Run metadata
    md.push_str("## Crawl Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", result.start_url));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        result.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        result.duration.as_secs_f64()
    ));
    md.push_str(&format!("- **Total URLs**: {}\n", result.visited_count));
    md.push_str(&format!("- **Max Depth**: {}\n", result.max_depth));
    md.push_str(&format!(
        "- **Status**: {}\n\n",
        if result.completed {
            "completed"
        } else {
            "stopped"
        }
    ));

    // Depth breakdown
    if !result.pages.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, urls) in &result.pages {
            md.push_str(&format!("| {} | {} |\n", depth, urls.len()));
        }
        md.push('\n');
    }

    for (depth, urls) in &result.pages {
        md.push_str(&format!("## Depth {} ({} URLs)\n\n", depth, urls.len()));
        for url in urls {
            md.push_str(&format!("- <{}>\n", url));
        }
        md.push('\n');
    }

    // Failures
    if !result.failures.is_empty() {
        md.push_str("## Failed URLs\n\n");
        md.push_str("| URL | Error | Attempts | Depth |\n");
        md.push_str("|-----|-------|----------|-------|\n");
        for (url, record) in &result.failures {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                escape_cell(url),
                escape_cell(&record.error),
                record.attempts,
                record.depth
            ));
        }
        md.push('\n');
    }

    md
}

/// Keeps a value from breaking a table row
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
