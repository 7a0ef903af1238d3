//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, for both the site strategy and the
//! repository strategy.

use doc_crawler::config::{Config, CrawlerConfig, HttpConfig, RepositoryConfig};
use doc_crawler::crawler::{crawl, CrawlTarget, PageRecord};
use doc_crawler::output::write_json_file;
use doc_crawler::CrawlError;
use futures::StreamExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration whose repository host is the mock server
fn create_test_config(base_url: &str, max_concurrent: u32) -> Config {
    let host = url::Url::parse(base_url)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    Config {
        crawler: CrawlerConfig {
            max_concurrent,
            ..CrawlerConfig::default()
        },
        http: HttpConfig {
            timeout_secs: 5,
            connect_timeout_secs: 2,
            ..HttpConfig::default()
        },
        repository: RepositoryConfig {
            host,
            api_base: base_url.to_string(),
            raw_base: base_url.to_string(),
        },
    }
}

/// Config for site crawls, leaving the repository host untouched
fn site_config() -> Config {
    Config::default()
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts the small docs site used by most site tests
///
/// ```text
/// /docs/       -> /docs/a, /docs/b, /other/c
/// /docs/a      -> /docs/b, /docs/deep, /docs/search.html
/// /docs/b      (leaf)
/// /docs/deep   (leaf)
/// ```
async fn mount_docs_site(server: &MockServer) {
    mount_html(
        server,
        "/docs/",
        r#"<html><head><title>Docs</title></head><body>
            <h1>Welcome</h1>
            <a href="/docs/a">A</a>
            <a href="b">B</a>
            <a href="/other/c">C</a>
        </body></html>"#,
    )
    .await;
    mount_html(
        server,
        "/docs/a",
        r#"<html><body><p>Page A</p>
            <a href="/docs/b">B</a>
            <a href="/docs/deep">Deep</a>
            <a href="/docs/search.html">Search</a>
            <a href="/docs/">Home</a>
        </body></html>"#,
    )
    .await;
    mount_html(server, "/docs/b", "<html><body><p>Page B</p></body></html>").await;
    mount_html(server, "/docs/deep", "<html><body><p>Deep page</p></body></html>").await;
    mount_html(server, "/docs/search.html", "<html><body><p>Search</p></body></html>").await;
    mount_html(server, "/other/c", "<html><body><p>Elsewhere</p></body></html>").await;
}

async fn run_crawl(config: &Config, start: &str, max_depth: u32) -> Vec<PageRecord> {
    let target = CrawlTarget::new(start, max_depth).expect("valid target");
    let pages = crawl(config, &target).await.expect("crawl should start");
    pages.into_stream().collect().await
}

fn urls(records: &[PageRecord]) -> Vec<String> {
    records.iter().map(|r| r.url.clone()).collect()
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_site_crawl_depth_zero() {
    let mock_server = MockServer::start().await;
    mount_docs_site(&mock_server).await;

    let records = run_crawl(&site_config(), &format!("{}/docs/", mock_server.uri()), 0).await;

    assert_eq!(urls(&records), vec![format!("{}/docs/", mock_server.uri())]);
    assert!(records[0].content.contains("Welcome"));
    assert!(!records[0].content.contains("<a"));
    assert_eq!(requested_paths(&mock_server).await, vec!["/docs/"]);
}

#[tokio::test]
async fn test_site_crawl_breadth_first_within_scope() {
    let mock_server = MockServer::start().await;
    mount_docs_site(&mock_server).await;
    let base = mock_server.uri();

    // Start without the trailing slash; it is normalized to /docs/
    let records = run_crawl(&site_config(), &format!("{}/docs", base), 1).await;

    assert_eq!(
        urls(&records),
        vec![
            format!("{}/docs/", base),
            format!("{}/docs/a", base),
            format!("{}/docs/b", base),
        ]
    );

    let requested = requested_paths(&mock_server).await;
    assert!(!requested.contains(&"/other/c".to_string()));
    assert!(!requested.contains(&"/docs/deep".to_string()));
}

#[tokio::test]
async fn test_site_crawl_respects_depth_and_ignore_list() {
    let mock_server = MockServer::start().await;
    mount_docs_site(&mock_server).await;
    let base = mock_server.uri();

    let records = run_crawl(&site_config(), &format!("{}/docs/", base), 2).await;

    assert_eq!(
        urls(&records),
        vec![
            format!("{}/docs/", base),
            format!("{}/docs/a", base),
            format!("{}/docs/b", base),
            format!("{}/docs/deep", base),
        ]
    );

    let requested = requested_paths(&mock_server).await;
    assert!(!requested.contains(&"/docs/search.html".to_string()));

    // Every page is fetched at most once
    let mut unique = requested.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), requested.len());
}

#[tokio::test]
async fn test_site_crawl_survives_dead_links() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_html(
        &mock_server,
        "/docs/",
        r#"<html><body><p>Index</p>
            <a href="/docs/missing">Missing</a>
            <a href="/docs/broken">Broken</a>
            <a href="/docs/ok">Ok</a>
        </body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/docs/ok", "<html><body><p>Fine</p></body></html>").await;
    // /docs/missing falls through to wiremock's default 404

    let records = run_crawl(&site_config(), &format!("{}/docs/", base), 1).await;

    assert_eq!(
        urls(&records),
        vec![format!("{}/docs/", base), format!("{}/docs/ok", base)]
    );
}

#[tokio::test]
async fn test_site_crawl_follows_relative_links_after_redirect() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_html(
        &mock_server,
        "/docs/",
        r#"<html><body><p>Index</p><a href="guide">Guide</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/guide"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/docs/guide/"))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/docs/guide/",
        r#"<html><body><p>Guide</p><a href="intro">Intro</a></body></html>"#,
    )
    .await;
    mount_html(
        &mock_server,
        "/docs/guide/intro",
        "<html><body><p>Introduction</p></body></html>",
    )
    .await;

    let records = run_crawl(&site_config(), &format!("{}/docs/", base), 3).await;

    assert_eq!(
        urls(&records),
        vec![
            format!("{}/docs/", base),
            format!("{}/docs/guide", base),
            format!("{}/docs/guide/intro", base),
        ]
    );
    assert!(!requested_paths(&mock_server)
        .await
        .contains(&"/docs/intro".to_string()));
}

#[tokio::test]
async fn test_site_crawl_skips_empty_pages() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_html(
        &mock_server,
        "/docs/",
        r#"<html><body><p>Index</p><a href="/docs/blank">Blank</a></body></html>"#,
    )
    .await;
    mount_html(
        &mock_server,
        "/docs/blank",
        "<html><head><script>var x = 1;</script></head><body>  </body></html>",
    )
    .await;

    let records = run_crawl(&site_config(), &format!("{}/docs/", base), 1).await;
    assert_eq!(urls(&records), vec![format!("{}/docs/", base)]);
}

#[tokio::test]
async fn test_site_crawl_bounded_concurrency() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let links: String = (0..6)
        .map(|i| format!(r#"<a href="/docs/p{}">P{}</a>"#, i, i))
        .collect();
    mount_html(
        &mock_server,
        "/docs/",
        &format!("<html><body><p>Index</p>{}</body></html>", links),
    )
    .await;
    for i in 0..6 {
        mount_html(
            &mock_server,
            &format!("/docs/p{}", i),
            &format!("<html><body><p>Page {}</p></body></html>", i),
        )
        .await;
    }

    let mut config = site_config();
    config.crawler.max_concurrent = 2;
    let records = run_crawl(&config, &format!("{}/docs/", base), 1).await;

    // Order follows discovery, not completion
    let expected: Vec<String> = std::iter::once(format!("{}/docs/", base))
        .chain((0..6).map(|i| format!("{}/docs/p{}", base, i)))
        .collect();
    assert_eq!(urls(&records), expected);
}

#[tokio::test]
async fn test_repository_crawl_reads_markdown_tree() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/repos/org/repo/git/trees/main"))
        .and(query_param("recursive", "1"))
        .and(header("X-GitHub-Api-Version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sha": "abc123",
            "truncated": false,
            "tree": [
                {"path": "README.md", "type": "blob"},
                {"path": "docs", "type": "tree"},
                {"path": "docs/a.md", "type": "blob"},
                {"path": "docs/b.txt", "type": "blob"},
                {"path": "docs/guide/intro.mdx", "type": "blob"},
                {"path": "docs-old/x.md", "type": "blob"},
                {"path": "other/c.md", "type": "blob"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/org/repo/main/docs/a.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# A\n\n[next](./guide/intro.mdx)\n"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/org/repo/main/docs/guide/intro.mdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Intro\n"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base, 5);
    let records = run_crawl(&config, &format!("{}/org/repo/tree/main/docs", base), 3).await;

    assert_eq!(
        urls(&records),
        vec![
            format!("{}/org/repo/main/docs/a.md", base),
            format!("{}/org/repo/main/docs/guide/intro.mdx", base),
        ]
    );
    assert_eq!(records[0].content, "# A\n\n[next](./guide/intro.mdx)\n");

    let requested = requested_paths(&mock_server).await;
    assert!(!requested.contains(&"/org/repo/main/docs/b.txt".to_string()));
    assert!(!requested.contains(&"/org/repo/main/other/c.md".to_string()));
    assert!(!requested.contains(&"/org/repo/main/docs-old/x.md".to_string()));
}

#[tokio::test]
async fn test_repository_listing_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/repos/org/repo/git/trees/main"))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base, 5);
    let target = CrawlTarget::new(&format!("{}/org/repo/tree/main/docs", base), 2).unwrap();

    let result = crawl(&config, &target).await;
    assert!(matches!(result, Err(CrawlError::RepositoryListing { .. })));
}

#[tokio::test]
async fn test_malformed_repository_url_makes_no_requests() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let config = create_test_config(&base, 5);
    let target = CrawlTarget::new(&format!("{}/org/repo", base), 2).unwrap();

    let result = crawl(&config, &target).await;
    assert!(matches!(result, Err(CrawlError::Usage(_))));
    assert!(requested_paths(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_crawl_output_written_as_json() {
    let mock_server = MockServer::start().await;
    mount_docs_site(&mock_server).await;
    let base = mock_server.uri();

    let records = run_crawl(&site_config(), &format!("{}/docs/", base), 1).await;

    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("corpus.json");
    write_json_file(&records, &out).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let array = written.as_array().expect("top-level array");
    assert_eq!(array.len(), 3);
    assert_eq!(array[0]["url"], format!("{}/docs/", base));
    assert!(array[0]["content"].as_str().unwrap().contains("Welcome"));
}
