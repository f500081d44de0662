//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a priming run from start to finish:
//! - Checking the local cache root before anything else
//! - Fetching and ordering the sitemap
//! - Skipping cached URLs and requesting the rest, one at a time
//! - Isolating per-URL failures and pacing requests

use crate::cache::{verify_cache_dir, CacheProbe};
use crate::config::CrawlConfig;
use crate::crawler::{build_http_client, prime_url};
use crate::output::CrawlSummary;
use crate::sitemap::sitemap_urls;
use crate::state::{RunState, UrlOutcome};
use crate::PrimerError;
use reqwest::Client;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlConfig,
    client: Client,
    probe: Option<CacheProbe>,
    state: RunState,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// In local mode the cache directory must already exist; the run fails
    /// here, before the sitemap is fetched, if it doesn't.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(PrimerError::Config)` - The cache directory is missing
    /// * `Err(PrimerError::Reqwest)` - The HTTP client couldn't be built
    pub fn new(config: CrawlConfig) -> Result<Self, PrimerError> {
        let probe = match &config.local {
            Some(local) => {
                verify_cache_dir(&local.cache_dir)?;
                let probe = CacheProbe::new(local);
                tracing::info!("Local mode: probing {}", probe.cache_dir().display());
                Some(probe)
            }
            None => None,
        };

        let client = build_http_client(&config)?;

        Ok(Self {
            config,
            client,
            probe,
            state: RunState::NotStarted,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs the whole pipeline: fetch the sitemap, then crawl its URLs
    pub async fn run(&mut self) -> Result<CrawlSummary, PrimerError> {
        let urls = self.fetch_urls().await?;
        self.crawl_urls(&urls).await
    }

    /// Fetches the sitemap and returns its URLs, highest priority first
    ///
    /// A failure here is fatal to the run and leaves it in `RunState::Failed`.
    pub async fn fetch_urls(&mut self) -> Result<Vec<String>, PrimerError> {
        self.transition(RunState::FetchingSitemap)?;

        match sitemap_urls(&self.client, &self.config.sitemap).await {
            Ok(urls) => {
                tracing::info!("Found {} URLs in {}", urls.len(), self.config.sitemap);
                Ok(urls)
            }
            Err(e) => {
                self.transition(RunState::Failed)?;
                Err(e.into())
            }
        }
    }

    /// Crawls the given URLs in order
    ///
    /// Per-URL problems are logged and tallied; they never abort the loop.
    pub async fn crawl_urls(&mut self, urls: &[String]) -> Result<CrawlSummary, PrimerError> {
        self.transition(RunState::CrawlingUrls)?;

        let start_time = Instant::now();
        let mut summary = CrawlSummary::new(urls.len());

        for url in urls {
            if self.is_primed(url) {
                tracing::debug!("Cached, skipping {}", url);
                summary.record(&UrlOutcome::Skipped);
                continue;
            }

            // Past the limit the remaining URLs are still probed, so only
            // uncached ones count as not attempted
            if let Some(max) = self.config.max_primes {
                if summary.requested() >= max {
                    if summary.not_attempted == 0 {
                        tracing::info!("Uncached page prime limit ({}) reached", max);
                    }
                    summary.not_attempted += 1;
                    continue;
                }
            }

            if summary.requested() > 0 && !self.config.crawl_delay.is_zero() {
                tokio::time::sleep(self.config.crawl_delay).await;
            }

            tracing::debug!("Priming {}", url);
            let outcome = prime_url(&self.client, url).await;

            self.report(url, &outcome);
            summary.record(&outcome);
        }

        summary.elapsed = start_time.elapsed();
        self.transition(RunState::Done)?;

        Ok(summary)
    }

    /// Returns true if local mode is on and the URL is already cached
    ///
    /// A URL that can't be mapped onto the cache is reported and treated as
    /// not cached.
    fn is_primed(&self, url: &str) -> bool {
        let Some(probe) = &self.probe else {
            return false;
        };

        match probe.is_primed(url) {
            Ok(primed) => primed,
            Err(e) => {
                tracing::warn!("Can't probe the local cache for {}: {}", url, e);
                false
            }
        }
    }

    fn report(&self, url: &str, outcome: &UrlOutcome) {
        match outcome {
            UrlOutcome::CrawlFailed { error } if self.config.warn_failures => {
                tracing::error!("Couldn't crawl {}. Error: {}", url, error);
            }
            UrlOutcome::Crawled { status } if outcome.is_bad_status() && self.config.warn_failures => {
                tracing::warn!("Bad response for {}: HTTP {}", url, status);
            }
            _ => tracing::debug!("{}: {}", url, outcome),
        }
    }

    fn transition(&mut self, next: RunState) -> Result<(), PrimerError> {
        if !self.state.can_transition_to(next) {
            return Err(PrimerError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("Run state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use sitemap_primer::config::CrawlConfig;
/// use sitemap_primer::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::new("https://example.com/sitemap.xml");
/// let summary = run_crawl(config).await?;
/// println!("{} pages crawled", summary.crawled);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlSummary, PrimerError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
