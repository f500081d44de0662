//! Decompressing sitemap fetcher
//!
//! Sitemaps are often stored or served gzip-compressed, and some servers
//! compress an already-compressed file again on the way out. Remote payloads
//! are therefore unwrapped one gzip layer at a time until a layer fails to
//! decode.

use crate::SitemapError;
use flate2::read::MultiGzDecoder;
use reqwest::header::CONTENT_ENCODING;
use reqwest::Client;
use std::io::Read;
use std::path::Path;
use url::Url;

/// Upper bound on gzip passes, so a self-reproducing payload can't loop forever
pub const MAX_GZIP_LAYERS: usize = 16;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns true if the bytes start with the gzip magic number
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Decodes a single gzip layer
///
/// A layer may consist of several concatenated gzip members (as written by
/// `cat a.gz b.gz` or bgzip); all of them are decoded.
pub fn gunzip_once(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Decodes gzip layers until a pass fails
///
/// Returns the last successfully decoded payload (the input itself if not
/// even the first pass succeeds) and the number of layers removed.
pub fn gunzip_layers(bytes: Vec<u8>) -> (Vec<u8>, usize) {
    let mut data = bytes;
    let mut layers = 0;

    while layers < MAX_GZIP_LAYERS && is_gzip(&data) {
        match gunzip_once(&data) {
            Ok(decoded) => {
                data = decoded;
                layers += 1;
            }
            Err(e) => {
                tracing::debug!("Stopping after {} gzip layer(s): {}", layers, e);
                break;
            }
        }
    }

    (data, layers)
}

/// Fetches a remote sitemap and removes any gzip layers
///
/// The body is decompressed when the response declares
/// `Content-Encoding: gzip` or the URL path ends in `.gz`. Any non-2xx
/// status is an error.
pub async fn fetch_remote(client: &Client, url: &Url) -> Result<Vec<u8>, SitemapError> {
    tracing::info!("Downloading sitemap {}", url);

    let http_error = |source| SitemapError::Http {
        location: url.to_string(),
        source,
    };

    let response = client.get(url.clone()).send().await.map_err(http_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SitemapError::Status {
            location: url.to_string(),
            status: status.as_u16(),
        });
    }

    let declared_gzip = response
        .headers()
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false);

    let body = response.bytes().await.map_err(http_error)?.to_vec();

    if declared_gzip || url.path().ends_with(".gz") {
        let (data, layers) = gunzip_layers(body);
        tracing::debug!("Removed {} gzip layer(s) from {}", layers, url);
        Ok(data)
    } else {
        Ok(body)
    }
}

/// Reads a local sitemap file as-is
///
/// Local files get at most one gzip pass, applied by the caller only when the
/// plain bytes fail to parse.
pub async fn read_local(path: &Path) -> Result<Vec<u8>, SitemapError> {
    tokio::fs::read(path).await.map_err(|source| SitemapError::Read {
        location: path.display().to_string(),
        source,
    })
}
