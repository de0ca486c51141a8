//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end with the HTTP page fetcher.

use sitemapper::config::{Config, OutputFormat, UserAgentConfig};
use sitemapper::crawler::{HttpPageFetcher, RetryPolicy};
use sitemapper::output::report_for;
use sitemapper::{crawl, crawl_with_config, CrawlOptions, CrawlResult, PageFetcher};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page linking to the given hrefs
async fn mount_page(server: &MockServer, page: &str, links: &[&str]) {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    format!(
                        "<html><head><title>{}</title></head><body>{}</body></html>",
                        page, anchors
                    ),
                    "text/html; charset=utf-8",
                ),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn test_fetcher() -> Arc<dyn PageFetcher> {
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: None,
    };
    Arc::new(HttpPageFetcher::new(&user_agent).expect("Failed to build HTTP client"))
}

fn test_options(max_depth: u32) -> CrawlOptions {
    CrawlOptions {
        max_depth,
        concurrency_limit: 4,
        retry: RetryPolicy::immediate(2),
        excluded_extensions: vec!["pdf".to_string(), "zip".to_string()],
        request_timeout: Duration::from_secs(5),
    }
}

fn depth_paths(result: &CrawlResult, depth: u32) -> Vec<String> {
    result
        .pages
        .get(&depth)
        .map(|urls| {
            urls.iter()
                .map(|u| url::Url::parse(u).expect("visited URL").path().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", &["/a", "/b"]).await;
    mount_page(&mock_server, "/a", &["/c"]).await;
    mount_page(&mock_server, "/b", &["/c", "/a"]).await;
    mount_page(&mock_server, "/c", &["/"]).await;

    let start = format!("{}/", mock_server.uri());
    let result = crawl(&start, test_options(2), test_fetcher())
        .await
        .expect("Crawl should run");

    assert_eq!(depth_paths(&result, 0), vec!["/"]);
    assert_eq!(depth_paths(&result, 1), vec!["/a", "/b"]);
    assert_eq!(depth_paths(&result, 2), vec!["/c"]);
    assert_eq!(result.visited_count, 4);
    assert!(result.failures.is_empty());
    assert!(result.completed);

    // The domain carries the mock server's port
    let port = url::Url::parse(&mock_server.uri())
        .expect("Failed to parse base URL")
        .port()
        .expect("Mock server has a port");
    assert_eq!(result.domain, format!("127.0.0.1:{}", port));
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", &["/broken", "/ok"]).await;
    mount_page(&mock_server, "/ok", &[]).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let start = format!("{}/", mock_server.uri());
    let result = crawl(&start, test_options(2), test_fetcher())
        .await
        .expect("Crawl should run");

    assert_eq!(result.failures.len(), 1);
    let broken = format!("{}/broken", mock_server.uri());
    let record = &result.failures[&broken];
    assert_eq!(record.error, "HTTP 500");
    assert_eq!(record.attempts, 3);
    assert_eq!(record.depth, 1);

    // Still listed in the sitemap at the depth it was found
    assert_eq!(result.depth_of(&broken), Some(1));
}

#[tokio::test]
async fn test_excluded_extensions_not_requested() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", &["/report.pdf", "/Archive.ZIP", "/page"]).await;
    mount_page(&mock_server, "/page", &[]).await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let start = format!("{}/", mock_server.uri());
    let result = crawl(&start, test_options(3), test_fetcher())
        .await
        .expect("Crawl should run");

    assert_eq!(depth_paths(&result, 1), vec!["/page"]);
    assert_eq!(result.visited_count, 2);
}

#[tokio::test]
async fn test_other_domains_not_requested() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(0)
        .mount(&other_server)
        .await;

    let external = format!("{}/elsewhere", other_server.uri());
    mount_page(&mock_server, "/", &[external.as_str(), "/local"]).await;
    mount_page(&mock_server, "/local", &[]).await;

    let start = format!("{}/", mock_server.uri());
    let result = crawl(&start, test_options(3), test_fetcher())
        .await
        .expect("Crawl should run");

    assert_eq!(result.depth_of(&external), None);
    assert_eq!(depth_paths(&result, 1), vec!["/local"]);
}

#[tokio::test]
async fn test_non_html_response_is_a_failure() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", &["/data"]).await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{}", "application/json"),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let start = format!("{}/", mock_server.uri());
    let result = crawl(&start, test_options(1), test_fetcher())
        .await
        .expect("Crawl should run");

    let data = format!("{}/data", mock_server.uri());
    assert!(result.failures[&data].error.contains("application/json"));
}

#[tokio::test]
async fn test_max_depth_zero_fetches_only_start() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", &["/a"]).await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let start = format!("{}/", mock_server.uri());
    let result = crawl(&start, test_options(0), test_fetcher())
        .await
        .expect("Crawl should run");

    assert_eq!(result.visited_count, 1);
    assert_eq!(result.pages.len(), 1);
}

#[tokio::test]
async fn test_crawl_with_config_writes_report() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(&mock_server, "/", &["/about", "/contact"]).await;
    mount_page(&mock_server, "/about", &[]).await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.crawler.max_depth = 1;
    config.crawler.max_retries = 0;
    config.output.format = OutputFormat::Html;
    config.output.path = dir
        .path()
        .join("sitemap.html")
        .to_string_lossy()
        .into_owned();

    let start = format!("{}/", mock_server.uri());
    let result = crawl_with_config(&start, &config)
        .await
        .expect("Crawl should run");

    let report = report_for(config.output.format, std::path::Path::new(&config.output.path));
    report.render(&result).expect("Report should render");

    let html = std::fs::read_to_string(&config.output.path).expect("Report file");
    assert!(html.contains("<h2>Depth 1 (2 URLs)</h2>"));
    assert!(html.contains(&format!("{}/about", mock_server.uri())));
    assert!(html.contains("Failed URLs"));
    assert!(html.contains("HTTP 404"));
}

#[tokio::test]
async fn test_invalid_start_url_fetches_nothing() {
    let result = crawl("not-a-url", test_options(2), test_fetcher()).await;
    assert!(matches!(
        result,
        Err(sitemapper::SitemapError::InvalidInput(_))
    ));
}
