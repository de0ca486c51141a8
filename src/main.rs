//! Sitemapper main entry point
//!
//! This is the command-line interface for the Sitemapper site crawler.

use anyhow::Context;
use clap::Parser;
use sitemapper::config::{load_config_with_hash, validate, Config, OutputFormat};
use sitemapper::crawler::{Coordinator, CrawlOptions, HttpPageFetcher};
use sitemapper::output::{print_statistics, report_for};
use sitemapper::parse_start_url;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Sitemapper: a bounded-concurrency sitemap crawler
///
/// Sitemapper crawls every page of one site reachable from a start URL
/// within a number of link hops, breadth-first, and writes a sitemap grouped
/// by depth together with the pages that could not be fetched.
#[derive(Parser, Debug)]
#[command(name = "sitemapper")]
#[command(version)]
#[command(about = "A bounded-concurrency sitemap crawler", long_about = None)]
struct Cli {
    /// URL the crawl starts from
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of link hops from the start URL
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of fetches in flight
    #[arg(long)]
    concurrency: Option<u32>,

    /// Additional attempts after a failed fetch
    #[arg(long)]
    retries: Option<u32>,

    /// Time allowed for one fetch attempt, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// File extension to skip (repeatable; replaces the configured list)
    #[arg(long = "exclude", value_name = "EXT")]
    exclude: Vec<String>,

    /// Path of the rendered sitemap
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sitemap format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Also append log output to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Validate the configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        return handle_dry_run(&cli.start_url, &config);
    }

    handle_crawl(&cli.start_url, config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Console output always goes to stdout; with `log_file` the same events are
/// appended to that file without ANSI colors.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemapper=info,warn"),
            1 => EnvFilter::new("sitemapper=debug,info"),
            2 => EnvFilter::new("sitemapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrency = concurrency;
    }
    if let Some(retries) = cli.retries {
        config.crawler.max_retries = retries;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.crawler.request_timeout_ms = timeout_ms;
    }
    if !cli.exclude.is_empty() {
        config.crawler.excluded_extensions = cli.exclude.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.to_string_lossy().into_owned();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: validates input and shows what would be crawled
fn handle_dry_run(start_url: &str, config: &Config) -> anyhow::Result<()> {
    let url = parse_start_url(start_url)
        .with_context(|| format!("Invalid start URL {}", start_url))?;

    println!("=== Sitemapper Dry Run ===\n");

    println!("Start URL: {}", url);
    if let Some(domain) = sitemapper::extract_domain(&url) {
        println!("Domain: {}", domain);
    }

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!("  Max retries: {}", config.crawler.max_retries);
    println!("  Request timeout: {}ms", config.crawler.request_timeout_ms);
    println!(
        "  Excluded extensions: {}",
        config.crawler.excluded_extensions.join(", ")
    );

    println!("\nRetry Backoff:");
    println!("  Initial: {}ms", config.retry.initial_backoff_ms);
    println!("  Multiplier: {}", config.retry.backoff_multiplier);
    println!("  Max: {}ms", config.retry.max_backoff_ms);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);
    println!("  Format: {}", config.output.format);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(start_url: &str, config: Config, quiet: bool) -> anyhow::Result<()> {
    let fetcher = HttpPageFetcher::new(&config.user_agent).context("Failed to build HTTP client")?;

    let mut coordinator = Coordinator::new(
        start_url,
        CrawlOptions::from(&config),
        Arc::new(fetcher),
    )?;

    let stop = coordinator.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current depth");
            stop.stop();
        }
    });

    tracing::info!(
        "Starting crawl of {} (max depth: {})",
        start_url,
        config.crawler.max_depth
    );
    let result = coordinator.run().await;

    let report = report_for(config.output.format, Path::new(&config.output.path));
    report
        .render(&result)
        .with_context(|| format!("Failed to write {} sitemap", report.name()))?;

    if !quiet {
        print_statistics(&result);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_flag() {
        let cli = Cli::try_parse_from([
            "sitemapper",
            "https://example.com/",
            "--log-file",
            "sitemap_generator.log",
        ])
        .unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from("sitemap_generator.log")));
    }

    #[test]
    fn test_log_file_defaults_to_console_only() {
        let cli = Cli::try_parse_from(["sitemapper", "https://example.com/"]).unwrap();
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "sitemapper",
            "https://example.com/",
            "--max-depth",
            "1",
            "--exclude",
            "gif",
            "--exclude",
            "svg",
            "--format",
            "markdown",
        ])
        .unwrap();

        let config = load_effective_config(&cli).unwrap();
        assert_eq!(config.crawler.max_depth, 1);
        assert_eq!(config.crawler.excluded_extensions, vec!["gif", "svg"]);
        assert_eq!(config.output.format, OutputFormat::Markdown);
    }
}
