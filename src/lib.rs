//! Sitemap-Primer: a sitemap-driven cache primer
//!
//! This crate warms a web server's page cache by requesting every URL listed in
//! an XML sitemap, highest priority first. In local mode the on-disk page cache
//! is probed first and only pages that aren't already cached are requested.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sitemap-Primer operations
#[derive(Debug, Error)]
pub enum PrimerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sitemap(#[from] SitemapError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No sitemap given on the command line or in the config file")]
    MissingSitemap,

    #[error(
        "The folder {} doesn't seem to exist. Please ensure that cache-dir points to the base of the local file cache",
        .0.display()
    )]
    CacheDirMissing(PathBuf),
}

/// Errors raised while acquiring a sitemap
///
/// Every variant names the sitemap location so the message is useful on its own.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Invalid sitemap URL {location}: {source}")]
    InvalidUrl {
        location: String,
        source: url::ParseError,
    },

    #[error("Couldn't read {location}: {source}")]
    Read {
        location: String,
        source: std::io::Error,
    },

    #[error("Couldn't fetch {location}: {source}")]
    Http {
        location: String,
        source: reqwest::Error,
    },

    #[error("Couldn't fetch {location}: HTTP {status}")]
    Status { location: String, status: u16 },

    #[error("Couldn't parse {location}. Is it a valid sitemap XML file? Error: {source}")]
    Parse {
        location: String,
        source: ParseError,
    },
}

/// Sitemap document errors, independent of where the bytes came from
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("document has no root element")]
    Empty,

    #[error("unexpected root element <{0}>, expected <urlset>")]
    UnexpectedRoot(String),

    #[error("sitemap index files are not supported")]
    SitemapIndex,

    #[error("<url> entry {0} has no <loc>")]
    MissingLoc(usize),
}

/// Cache probe errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("URL {url} does not start with the configured base {base}")]
    BaseMismatch { url: String, base: String },

    #[error("Failed to parse URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("URL {0} escapes the cache directory")]
    Traversal(String),
}

/// Result type alias for Sitemap-Primer operations
pub type Result<T> = std::result::Result<T, PrimerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for cache probe operations
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// `User-Agent` sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Re-export commonly used types
pub use cache::CacheProbe;
pub use config::CrawlConfig;
pub use sitemap::{load_sitemap, SitemapEntry};
pub use state::{RunState, UrlOutcome};
