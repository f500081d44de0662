/// Run state definitions for tracking crawl progress
///
/// A run moves through `NotStarted → FetchingSitemap → CrawlingUrls → Done`,
/// or ends in `Failed` if the sitemap can't be acquired.
use std::fmt;

/// Represents the current state of a priming run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    // ===== Active States =====
    /// Nothing has happened yet
    NotStarted,

    /// The sitemap is being fetched and parsed
    FetchingSitemap,

    /// URLs are being probed and requested
    CrawlingUrls,

    // ===== Terminal States =====
    /// Every URL has been handled
    Done,

    /// The sitemap couldn't be acquired; no URL was requested
    Failed,
}

impl RunState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if moving from this state to `next` is allowed
    ///
    /// Only the sitemap stage may fail; per-URL problems never fail the run.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::FetchingSitemap)
                | (Self::FetchingSitemap, Self::CrawlingUrls)
                | (Self::FetchingSitemap, Self::Failed)
                | (Self::CrawlingUrls, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::FetchingSitemap => "fetching_sitemap",
            Self::CrawlingUrls => "crawling_urls",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible run states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::NotStarted,
            Self::FetchingSitemap,
            Self::CrawlingUrls,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
