//! Crawler module for priming pages
//!
//! This module contains the core priming logic, including:
//! - HTTP client construction and single-attempt page requests
//! - Overall run coordination (sitemap, cache probes, pacing)

mod coordinator;
mod fetcher;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, prime_url};

use crate::config::CrawlConfig;
use crate::output::CrawlSummary;
use crate::PrimerError;

/// Runs a complete priming run
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Check the local cache directory (local mode only)
/// 2. Build the HTTP client
/// 3. Fetch and order the sitemap
/// 4. Skip cached URLs and request the rest, one at a time
/// 5. Return a summary of what happened
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - The run completed (individual URLs may have failed)
/// * `Err(PrimerError)` - The run couldn't start or the sitemap couldn't be acquired
pub async fn crawl(config: CrawlConfig) -> Result<CrawlSummary, PrimerError> {
    run_crawl(config).await
}
