//! Local page cache probing
//!
//! In local mode the on-disk cache written by the site's caching layer is
//! checked before each request, so pages that are already cached aren't
//! requested again.

mod probe;

pub use probe::CacheProbe;

use crate::ConfigError;
use std::path::Path;

/// Checks that the cache root exists and is a directory
pub fn verify_cache_dir(cache_dir: &Path) -> Result<(), ConfigError> {
    if cache_dir.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::CacheDirMissing(cache_dir.to_path_buf()))
    }
}
