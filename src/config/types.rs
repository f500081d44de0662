use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for a single request, in seconds
pub const DEFAULT_REQUEST_TIMEOUT: f64 = 30.0;

/// On-disk configuration file for Sitemap-Primer
///
/// Every field is optional so the file can supply any subset of settings and
/// leave the rest to the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// URL or local path of the sitemap to prime from
    pub sitemap: Option<String>,

    /// Delay between requests (seconds, fractional allowed)
    #[serde(rename = "crawl-delay")]
    pub crawl_delay: Option<f64>,

    /// Timeout for a single request (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: Option<f64>,

    /// Maximum number of uncached URLs to request
    #[serde(rename = "max-primes")]
    pub max_primes: Option<usize>,

    /// Local mode settings; local mode is on when this section is present
    pub local: Option<LocalSection>,
}

/// `[local]` section of the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct LocalSection {
    /// Allows keeping the section around while switching local mode off
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Part of each sitemap URL that is not mirrored in the cache layout
    #[serde(rename = "url-base")]
    pub url_base: Option<String>,

    /// Root of the static file cache
    #[serde(rename = "cache-dir")]
    pub cache_dir: PathBuf,

    /// Name of the file created inside each mirrored folder
    #[serde(rename = "cache-file", default)]
    pub cache_file: String,
}

fn default_enabled() -> bool {
    true
}

/// Fully resolved settings for one run
///
/// Built once before crawling starts and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// URL or local path of the sitemap
    pub sitemap: String,

    /// Local cache settings; `None` means every URL is requested
    pub local: Option<LocalCacheConfig>,

    /// Pause between consecutive requests
    pub crawl_delay: Duration,

    /// Timeout for a single request
    pub request_timeout: Duration,

    /// Stop after this many requests (skipped URLs don't count)
    pub max_primes: Option<usize>,

    /// Log a line for every URL that failed or answered with an error status
    pub warn_failures: bool,
}

impl CrawlConfig {
    /// Creates a configuration with default settings for the given sitemap
    pub fn new(sitemap: impl Into<String>) -> Self {
        Self {
            sitemap: sitemap.into(),
            local: None,
            crawl_delay: Duration::ZERO,
            request_timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT),
            max_primes: None,
            warn_failures: true,
        }
    }

    /// Returns true if the local cache is probed before each request
    pub fn local_mode_enabled(&self) -> bool {
        self.local.is_some()
    }
}

/// Resolved local mode settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCacheConfig {
    /// Prefix stripped from each URL; `None` uses the URL's path instead
    pub url_base: Option<String>,

    /// Root of the static file cache
    pub cache_dir: PathBuf,

    /// Index file expected inside each mirrored folder (may be empty)
    pub cache_file: String,
}
