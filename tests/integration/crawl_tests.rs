//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full priming cycle end-to-end.

use flate2::write::GzEncoder;
use flate2::Compression;
use sitemap_primer::config::{CrawlConfig, LocalCacheConfig};
use sitemap_primer::crawler::{build_http_client, Coordinator};
use sitemap_primer::sitemap::sitemap_urls;
use sitemap_primer::state::RunState;
use sitemap_primer::{PrimerError, USER_AGENT};
use std::io::Write;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a sitemap document from (path, priority) pairs
fn sitemap_xml(base: &str, pages: &[(&str, Option<&str>)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for (page, priority) in pages {
        xml.push_str(&format!("<url><loc>{}{}</loc>", base, page));
        if let Some(priority) = priority {
            xml.push_str(&format!("<priority>{}</priority>", priority));
        }
        xml.push_str("</url>");
    }
    xml.push_str("</urlset>");
    xml
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn create_test_config(sitemap: &str) -> CrawlConfig {
    let mut config = CrawlConfig::new(sitemap);
    config.request_timeout = Duration::from_secs(5);
    config
}

async fn mount_sitemap(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, status: u16, expected: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(status).set_body_string("<html></html>"))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pages_requested_in_priority_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_sitemap(
        &mock_server,
        sitemap_xml(
            &base_url,
            &[
                ("/low", Some("0.1")),
                ("/none", None),
                ("/high", Some(".9")),
                ("/mid", Some("0.5")),
            ],
        ),
    )
    .await;
    for page in ["/low", "/none", "/high", "/mid"] {
        mount_page(&mock_server, page, 200, 1).await;
    }

    let sitemap = format!("{}/sitemap.xml", base_url);
    let mut coordinator = Coordinator::new(create_test_config(&sitemap)).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(coordinator.state(), RunState::Done);
    assert_eq!(summary.total_urls, 4);
    assert_eq!(summary.crawled, 4);
    assert_eq!(summary.failed, 0);

    let requests = mock_server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(paths, vec!["/sitemap.xml", "/high", "/mid", "/low", "/none"]);
}

#[tokio::test]
async fn test_duplicate_locations_requested_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_sitemap(
        &mock_server,
        sitemap_xml(
            &base_url,
            &[("/a", Some("0.1")), ("/b", Some("0.5")), ("/a", Some("0.9"))],
        ),
    )
    .await;
    mount_page(&mock_server, "/a", 200, 1).await;
    mount_page(&mock_server, "/b", 200, 1).await;

    let sitemap = format!("{}/sitemap.xml", base_url);
    let summary = sitemap_primer::crawler::crawl(create_test_config(&sitemap))
        .await
        .unwrap();
    assert_eq!(summary.total_urls, 2);
    assert_eq!(summary.crawled, 2);

    let requests = mock_server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(paths, vec!["/sitemap.xml", "/a", "/b"]);
}

#[tokio::test]
async fn test_requests_carry_primer_headers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header("user-agent", USER_AGENT))
        .and(header("accept-encoding", "gzip"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(sitemap_xml(&base_url, &[("/page", None)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", USER_AGENT))
        .and(header("accept-encoding", "gzip"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sitemap = format!("{}/sitemap.xml", base_url);
    let summary = sitemap_primer::crawler::crawl(create_test_config(&sitemap))
        .await
        .unwrap();

    assert_eq!(summary.crawled, 1);
    assert_eq!(summary.bad_status, 0);
}

#[tokio::test]
async fn test_stacked_gzip_sitemap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let xml = sitemap_xml(&base_url, &[("/a", Some("0.5")), ("/b", Some("0.9"))]);
    let body = gzip(&gzip(xml.as_bytes()));

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_bytes(body),
        )
        .mount(&mock_server)
        .await;

    let client = build_http_client(&create_test_config("unused")).unwrap();
    let urls = sitemap_urls(&client, &format!("{}/sitemap.xml", base_url))
        .await
        .unwrap();

    assert_eq!(
        urls,
        vec![format!("{}/b", base_url), format!("{}/a", base_url)]
    );
}

#[tokio::test]
async fn test_gz_suffix_sitemap_without_header() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let xml = sitemap_xml(&base_url, &[("/only", None)]);

    Mock::given(method("GET"))
        .and(path("/sitemap.xml.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gzip(xml.as_bytes())))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&create_test_config("unused")).unwrap();
    let urls = sitemap_urls(&client, &format!("{}/sitemap.xml.gz", base_url))
        .await
        .unwrap();

    assert_eq!(urls, vec![format!("{}/only", base_url)]);
}

#[tokio::test]
async fn test_local_mode_skips_cached_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let cache = TempDir::new().unwrap();
    std::fs::create_dir_all(cache.path().join("cached")).unwrap();
    std::fs::write(cache.path().join("cached/index.html"), "cached").unwrap();
    std::fs::create_dir_all(cache.path().join("partial")).unwrap();

    mount_sitemap(
        &mock_server,
        sitemap_xml(
            &base_url,
            &[("/cached/", Some("0.9")), ("/partial/", Some("0.5")), ("/fresh/", Some("0.1"))],
        ),
    )
    .await;
    mount_page(&mock_server, "/cached/", 200, 0).await;
    mount_page(&mock_server, "/partial/", 200, 1).await;
    mount_page(&mock_server, "/fresh/", 200, 1).await;

    let mut config = create_test_config(&format!("{}/sitemap.xml", base_url));
    config.local = Some(LocalCacheConfig {
        url_base: Some(base_url.clone()),
        cache_dir: cache.path().to_path_buf(),
        cache_file: "index.html".to_string(),
    });

    let summary = sitemap_primer::crawler::crawl(config).await.unwrap();

    assert_eq!(summary.total_urls, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.crawled, 2);
}

#[tokio::test]
async fn test_local_mode_missing_cache_dir_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cache = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/sitemap.xml", base_url));
    config.local = Some(LocalCacheConfig {
        url_base: None,
        cache_dir: cache.path().join("missing"),
        cache_file: String::new(),
    });

    let result = sitemap_primer::crawler::crawl(config).await;
    assert!(matches!(result, Err(PrimerError::Config(_))));
}

#[tokio::test]
async fn test_failed_url_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let body = format!(
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
<url><loc>http://127.0.0.1:1/refused</loc><priority>0.9</priority></url>
<url><loc>{}/after</loc><priority>0.5</priority></url>
</urlset>"#,
        base_url
    );
    mount_sitemap(&mock_server, body).await;
    mount_page(&mock_server, "/after", 200, 1).await;

    let sitemap = format!("{}/sitemap.xml", base_url);
    let summary = sitemap_primer::crawler::crawl(create_test_config(&sitemap))
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.crawled, 1);
}

#[tokio::test]
async fn test_bad_status_counts_as_crawled() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_sitemap(
        &mock_server,
        sitemap_xml(&base_url, &[("/gone", None), ("/broken", None)]),
    )
    .await;
    mount_page(&mock_server, "/gone", 404, 1).await;
    mount_page(&mock_server, "/broken", 500, 1).await;

    let sitemap = format!("{}/sitemap.xml", base_url);
    let summary = sitemap_primer::crawler::crawl(create_test_config(&sitemap))
        .await
        .unwrap();

    assert_eq!(summary.crawled, 2);
    assert_eq!(summary.bad_status, 2);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_max_primes_counts_only_uncached_remainder() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let cache = TempDir::new().unwrap();
    std::fs::create_dir_all(cache.path().join("cached")).unwrap();

    mount_sitemap(
        &mock_server,
        sitemap_xml(
            &base_url,
            &[("/1/", Some("0.9")), ("/2/", Some("0.8")), ("/cached/", Some("0.7"))],
        ),
    )
    .await;
    mount_page(&mock_server, "/1/", 200, 1).await;
    mount_page(&mock_server, "/2/", 200, 0).await;
    mount_page(&mock_server, "/cached/", 200, 0).await;

    let mut config = create_test_config(&format!("{}/sitemap.xml", base_url));
    config.max_primes = Some(1);
    config.local = Some(LocalCacheConfig {
        url_base: Some(base_url.clone()),
        cache_dir: cache.path().to_path_buf(),
        cache_file: String::new(),
    });

    let summary = sitemap_primer::crawler::crawl(config).await.unwrap();

    assert_eq!(summary.crawled, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.not_attempted, 1);
}

#[tokio::test]
async fn test_max_primes_limits_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_sitemap(
        &mock_server,
        sitemap_xml(
            &base_url,
            &[("/1", Some("0.9")), ("/2", Some("0.8")), ("/3", Some("0.7"))],
        ),
    )
    .await;
    mount_page(&mock_server, "/1", 200, 1).await;
    mount_page(&mock_server, "/2", 200, 1).await;
    mount_page(&mock_server, "/3", 200, 0).await;

    let mut config = create_test_config(&format!("{}/sitemap.xml", base_url));
    config.max_primes = Some(2);

    let summary = sitemap_primer::crawler::crawl(config).await.unwrap();

    assert_eq!(summary.crawled, 2);
    assert_eq!(summary.not_attempted, 1);
}

#[tokio::test]
async fn test_crawl_delay_paces_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_sitemap(
        &mock_server,
        sitemap_xml(&base_url, &[("/a", None), ("/b", None), ("/c", None)]),
    )
    .await;
    for page in ["/a", "/b", "/c"] {
        mount_page(&mock_server, page, 200, 1).await;
    }

    let mut config = create_test_config(&format!("{}/sitemap.xml", base_url));
    config.crawl_delay = Duration::from_millis(200);

    let summary = sitemap_primer::crawler::crawl(config).await.unwrap();

    // Two pauses between three requests, none after the last one
    assert_eq!(summary.crawled, 3);
    assert!(summary.elapsed >= Duration::from_millis(400));
    assert!(summary.elapsed < Duration::from_millis(600));
}

#[tokio::test]
async fn test_crawl_delay_not_applied_around_skipped_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let cache = TempDir::new().unwrap();
    std::fs::create_dir_all(cache.path().join("cached-1")).unwrap();
    std::fs::create_dir_all(cache.path().join("cached-2")).unwrap();

    mount_sitemap(
        &mock_server,
        sitemap_xml(
            &base_url,
            &[
                ("/cached-1/", Some("1.0")),
                ("/a/", Some("0.8")),
                ("/cached-2/", Some("0.6")),
                ("/b/", Some("0.4")),
            ],
        ),
    )
    .await;
    mount_page(&mock_server, "/cached-1/", 200, 0).await;
    mount_page(&mock_server, "/a/", 200, 1).await;
    mount_page(&mock_server, "/cached-2/", 200, 0).await;
    mount_page(&mock_server, "/b/", 200, 1).await;

    let mut config = create_test_config(&format!("{}/sitemap.xml", base_url));
    config.crawl_delay = Duration::from_millis(300);
    config.local = Some(LocalCacheConfig {
        url_base: Some(base_url.clone()),
        cache_dir: cache.path().to_path_buf(),
        cache_file: String::new(),
    });

    let summary = sitemap_primer::crawler::crawl(config).await.unwrap();

    // Only the pause between /a/ and /b/
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.crawled, 2);
    assert!(summary.elapsed >= Duration::from_millis(300));
    assert!(summary.elapsed < Duration::from_millis(600));
}

#[tokio::test]
async fn test_unmatched_url_base_still_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let cache = TempDir::new().unwrap();
    std::fs::create_dir_all(cache.path().join("page")).unwrap();

    mount_sitemap(&mock_server, sitemap_xml(&base_url, &[("/page/", None)])).await;
    mount_page(&mock_server, "/page/", 200, 1).await;

    let mut config = create_test_config(&format!("{}/sitemap.xml", base_url));
    config.local = Some(LocalCacheConfig {
        url_base: Some("http://nomatch".to_string()),
        cache_dir: cache.path().to_path_buf(),
        cache_file: String::new(),
    });

    let summary = sitemap_primer::crawler::crawl(config).await.unwrap();

    assert_eq!(summary.crawled, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_parent_segment_url_still_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // "<cache>/a/../b" exists on disk, but ".." segments are never followed
    let cache = TempDir::new().unwrap();
    std::fs::create_dir_all(cache.path().join("a")).unwrap();
    std::fs::create_dir_all(cache.path().join("b")).unwrap();

    mount_sitemap(&mock_server, sitemap_xml(&base_url, &[("/a/../b", None)])).await;
    mount_page(&mock_server, "/b", 200, 1).await;

    let mut config = create_test_config(&format!("{}/sitemap.xml", base_url));
    config.local = Some(LocalCacheConfig {
        url_base: Some(base_url.clone()),
        cache_dir: cache.path().to_path_buf(),
        cache_file: String::new(),
    });

    let summary = sitemap_primer::crawler::crawl(config).await.unwrap();

    assert_eq!(summary.crawled, 1);
    assert_eq!(summary.skipped, 0);
}

#[tokio::test]
async fn test_sitemap_error_status_fails_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sitemap = format!("{}/sitemap.xml", base_url);
    let mut coordinator = Coordinator::new(create_test_config(&sitemap)).unwrap();
    let result = coordinator.run().await;

    assert!(matches!(result, Err(PrimerError::Sitemap(_))));
    assert_eq!(coordinator.state(), RunState::Failed);
}

#[tokio::test]
async fn test_invalid_sitemap_fails_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_sitemap(&mock_server, "this is not xml".to_string()).await;

    let sitemap = format!("{}/sitemap.xml", base_url);
    let result = sitemap_primer::crawler::crawl(create_test_config(&sitemap)).await;

    match result {
        Err(PrimerError::Sitemap(e)) => assert!(e.to_string().starts_with("Couldn't parse")),
        other => panic!("expected a sitemap error, got {:?}", other.map(|s| s.crawled)),
    }
}
