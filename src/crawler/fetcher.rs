//! HTTP fetcher implementation
//!
//! This module handles the requests made while priming:
//! - Building the HTTP client with the primer's user agent and headers
//! - Requesting a page and draining its body
//! - Classifying transport errors

use crate::config::CrawlConfig;
use crate::state::UrlOutcome;
use crate::USER_AGENT;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use std::error::Error as StdError;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds an HTTP client with proper configuration
///
/// Every request carries `User-Agent: sitemap-primer/<version>` and
/// `Accept-Encoding: gzip`. Responses are never decoded by the client; the
/// sitemap fetcher unwraps gzip itself and page bodies are discarded. Idle
/// connections aren't pooled, so nothing stays open between URLs.
///
/// # Example
///
/// ```no_run
/// use sitemap_primer::config::CrawlConfig;
/// use sitemap_primer::crawler::build_http_client;
///
/// let config = CrawlConfig::new("https://example.com/sitemap.xml");
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(config.request_timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(config.request_timeout))
        .pool_max_idle_per_host(0)
        .build()
}

/// Requests a page so the server renders and caches it
///
/// The body is read to the end and discarded. Any response counts as
/// crawled, whatever its status; only transport errors produce
/// `UrlOutcome::CrawlFailed`. A single attempt is made.
pub async fn prime_url(client: &Client, url: &str) -> UrlOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return UrlOutcome::CrawlFailed {
                error: describe_error(&e),
            }
        }
    };

    let status = response.status().as_u16();

    match response.bytes().await {
        Ok(_) => UrlOutcome::Crawled { status },
        Err(e) => UrlOutcome::CrawlFailed {
            error: describe_error(&e),
        },
    }
}

/// Formats a request error with its cause chain
fn describe_error(error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "Request timeout"
    } else if error.is_connect() {
        "Connection failed"
    } else if error.is_builder() {
        "Invalid request"
    } else {
        "Request failed"
    };

    let mut message = format!("{}: {}", kind, error);
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
