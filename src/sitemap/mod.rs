//! Sitemap acquisition and parsing
//!
//! This module turns a sitemap location into a list of URLs ordered by
//! descending priority:
//! - Fetching remote sitemaps and stripping stacked gzip layers
//! - Reading local sitemaps, plain or gzipped
//! - Parsing the `<urlset>` document and ordering its entries

mod entry;
pub mod fetcher;
mod parser;

pub use entry::{EntryMap, Priority, SitemapEntry};
pub use fetcher::{fetch_remote, gunzip_layers, gunzip_once, read_local};
pub use parser::parse_sitemap;

use crate::{ParseError, SitemapError};
use reqwest::Client;
use std::path::PathBuf;
use url::Url;

/// Where a sitemap is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapSource {
    Remote(Url),
    Local(PathBuf),
}

impl SitemapSource {
    /// Classifies a location: `http://` and `https://` are URLs, anything
    /// else is a file path
    pub fn from_location(location: &str) -> Result<Self, SitemapError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location).map_err(|source| SitemapError::InvalidUrl {
                location: location.to_string(),
                source,
            })?;
            Ok(Self::Remote(url))
        } else {
            Ok(Self::Local(PathBuf::from(location)))
        }
    }
}

/// Loads a sitemap and returns its entries, highest priority first
///
/// # Arguments
///
/// * `client` - HTTP client used for remote sitemaps
/// * `location` - Sitemap URL or local file path
///
/// # Returns
///
/// * `Ok(Vec<SitemapEntry>)` - Deduplicated entries by descending priority
/// * `Err(SitemapError)` - The sitemap couldn't be fetched or parsed; the
///   error names the location
pub async fn load_sitemap(client: &Client, location: &str) -> Result<Vec<SitemapEntry>, SitemapError> {
    let parse_error = |source| SitemapError::Parse {
        location: location.to_string(),
        source,
    };

    match SitemapSource::from_location(location)? {
        SitemapSource::Remote(url) => {
            let bytes = fetch_remote(client, &url).await?;
            parse_sitemap(&bytes).map_err(parse_error)
        }
        SitemapSource::Local(path) => {
            let bytes = read_local(&path).await?;
            parse_local(&bytes).map_err(parse_error)
        }
    }
}

/// Loads a sitemap and returns only its URLs, highest priority first
pub async fn sitemap_urls(client: &Client, location: &str) -> Result<Vec<String>, SitemapError> {
    let entries = load_sitemap(client, location).await?;
    Ok(entries.into_iter().map(|entry| entry.url).collect())
}

/// Parses a local file, retrying through one gzip layer if the plain bytes
/// aren't a sitemap
fn parse_local(bytes: &[u8]) -> Result<Vec<SitemapEntry>, ParseError> {
    match parse_sitemap(bytes) {
        Ok(entries) => Ok(entries),
        Err(plain_error) => match gunzip_once(bytes) {
            Ok(decoded) => {
                tracing::debug!("Local sitemap is gzip-compressed");
                parse_sitemap(&decoded)
            }
            Err(_) => Err(plain_error),
        },
    }
}
