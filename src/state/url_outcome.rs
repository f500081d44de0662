use std::fmt;

/// What happened to a single sitemap URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    /// Already in the local cache; no request was made
    Skipped,

    /// The request completed; the status is recorded but not judged
    Crawled { status: u16 },

    /// The request failed before a response arrived
    CrawlFailed { error: String },
}

impl UrlOutcome {
    /// Returns true if the URL was crawled with a non-2xx status
    pub fn is_bad_status(&self) -> bool {
        matches!(self, Self::Crawled { status } if !(200..300).contains(status))
    }
}

impl fmt::Display for UrlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => write!(f, "skipped"),
            Self::Crawled { status } => write!(f, "crawled ({})", status),
            Self::CrawlFailed { error } => write!(f, "failed: {}", error),
        }
    }
}
