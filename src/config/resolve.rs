//! Merging of the configuration file with command-line overrides

use crate::config::types::{ConfigFile, CrawlConfig, LocalCacheConfig, DEFAULT_REQUEST_TIMEOUT};
use crate::config::validation::{parse_seconds, validate};
use crate::ConfigError;
use std::path::PathBuf;

/// Settings given on the command line
///
/// `Some` values take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub sitemap: Option<String>,
    pub crawl_delay: Option<f64>,
    /// Enables local mode on its own
    pub cache_dir: Option<PathBuf>,
    pub url_base: Option<String>,
    pub cache_file: Option<String>,
    /// Disables local mode even when the file enables it
    pub no_local: bool,
    pub max_primes: Option<usize>,
    pub no_warn: bool,
}

/// Resolves the file settings and overrides into a validated [`CrawlConfig`]
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - The settings for this run
/// * `Err(ConfigError::MissingSitemap)` - Neither source names a sitemap
/// * `Err(ConfigError)` - A value failed validation
pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<CrawlConfig, ConfigError> {
    let sitemap = overrides
        .sitemap
        .or(file.sitemap)
        .ok_or(ConfigError::MissingSitemap)?;

    let crawl_delay = parse_seconds(
        "crawl-delay",
        overrides.crawl_delay.or(file.crawl_delay).unwrap_or(0.0),
    )?;
    let request_timeout = parse_seconds(
        "request-timeout",
        file.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
    )?;

    let file_local = file.local.filter(|section| section.enabled);
    let local = if overrides.no_local {
        None
    } else {
        match (overrides.cache_dir, file_local) {
            (Some(cache_dir), section) => Some(LocalCacheConfig {
                url_base: overrides
                    .url_base
                    .or_else(|| section.as_ref().and_then(|s| s.url_base.clone())),
                cache_dir,
                cache_file: overrides
                    .cache_file
                    .or_else(|| section.map(|s| s.cache_file))
                    .unwrap_or_default(),
            }),
            (None, Some(section)) => Some(LocalCacheConfig {
                url_base: overrides.url_base.or(section.url_base),
                cache_dir: section.cache_dir,
                cache_file: overrides.cache_file.unwrap_or(section.cache_file),
            }),
            (None, None) => {
                if overrides.url_base.is_some() || overrides.cache_file.is_some() {
                    tracing::warn!("--url-base and --cache-file are ignored without a cache directory");
                }
                None
            }
        }
    };

    let config = CrawlConfig {
        sitemap,
        local,
        crawl_delay,
        request_timeout,
        max_primes: overrides.max_primes.or(file.max_primes),
        warn_failures: !overrides.no_warn,
    };

    validate(&config)?;

    Ok(config)
}
