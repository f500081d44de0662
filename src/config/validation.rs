use crate::config::types::{CrawlConfig, LocalCacheConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates a resolved configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_sitemap(&config.sitemap)?;
    if let Some(local) = &config.local {
        validate_local_config(local)?;
    }

    if config.request_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request-timeout must be greater than zero".to_string(),
        ));
    }

    if config.max_primes == Some(0) {
        return Err(ConfigError::Validation(
            "max-primes must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Converts a number of seconds into a `Duration`
///
/// Rejects negative, NaN and infinite values instead of panicking on them.
pub(crate) fn parse_seconds(name: &str, seconds: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        ConfigError::Validation(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, seconds
        ))
    })
}

/// Validates the sitemap location
///
/// Anything that isn't an http(s) URL is treated as a file path, so only
/// URLs are checked here.
fn validate_sitemap(sitemap: &str) -> Result<(), ConfigError> {
    if sitemap.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sitemap cannot be empty".to_string(),
        ));
    }

    if sitemap.starts_with("http://") || sitemap.starts_with("https://") {
        Url::parse(sitemap)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid sitemap URL '{}': {}", sitemap, e)))?;
    }

    Ok(())
}

/// Validates local mode settings
fn validate_local_config(local: &LocalCacheConfig) -> Result<(), ConfigError> {
    if local.cache_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "cache-dir cannot be empty in local mode".to_string(),
        ));
    }

    // A bare scheme such as "http://" is a legitimate base for caches that
    // mirror the host name, so the base is not required to be a full URL.
    if let Some(base) = &local.url_base {
        if base.is_empty() {
            return Err(ConfigError::Validation(
                "url-base cannot be empty when set".to_string(),
            ));
        }
    }

    if local.cache_file.contains('/') || local.cache_file == ".." {
        return Err(ConfigError::Validation(format!(
            "cache-file must be a plain file name, got '{}'",
            local.cache_file
        )));
    }

    Ok(())
}
