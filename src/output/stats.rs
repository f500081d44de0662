//! Run statistics
//!
//! Tallies the per-URL outcomes of a run and reports them when it finishes.

use crate::state::UrlOutcome;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Number of unique URLs in the sitemap
    pub total_urls: usize,

    /// URLs found in the local cache
    pub skipped: usize,

    /// URLs that received a response
    pub crawled: usize,

    /// Crawled URLs whose response status was not 2xx
    pub bad_status: usize,

    /// URLs whose request failed
    pub failed: usize,

    /// Uncached URLs left alone because the request limit was reached
    pub not_attempted: usize,

    /// Wall-clock duration of the crawl loop
    pub elapsed: Duration,
}

impl CrawlSummary {
    pub fn new(total_urls: usize) -> Self {
        Self {
            total_urls,
            ..Default::default()
        }
    }

    /// Adds one URL outcome to the tallies
    pub fn record(&mut self, outcome: &UrlOutcome) {
        match outcome {
            UrlOutcome::Skipped => self.skipped += 1,
            UrlOutcome::Crawled { .. } => {
                self.crawled += 1;
                if outcome.is_bad_status() {
                    self.bad_status += 1;
                }
            }
            UrlOutcome::CrawlFailed { .. } => self.failed += 1,
        }
    }

    /// Number of requests issued
    pub fn requested(&self) -> usize {
        self.crawled + self.failed
    }

    /// Percentage of issued requests that got a response
    pub fn success_rate(&self) -> f64 {
        let requested = self.requested();
        if requested > 0 {
            (self.crawled as f64 / requested as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Logs the summary at `info` level
pub fn log_summary(summary: &CrawlSummary) {
    tracing::info!(
        "URLs in sitemap: {}, skipped (cached): {}, crawled: {}, failed: {}",
        summary.total_urls,
        summary.skipped,
        summary.crawled,
        summary.failed
    );

    if summary.bad_status > 0 {
        tracing::info!("Responses with a non-2xx status: {}", summary.bad_status);
    }

    if summary.not_attempted > 0 {
        tracing::info!(
            "Request limit reached; {} URLs not attempted",
            summary.not_attempted
        );
    }

    tracing::info!(
        "Success rate: {:.1}% ({} / {} requests) in {:.1?}",
        summary.success_rate(),
        summary.crawled,
        summary.requested(),
        summary.elapsed
    );
}
