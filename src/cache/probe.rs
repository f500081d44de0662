use crate::config::LocalCacheConfig;
use crate::{ProbeError, ProbeResult};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use url::Url;

/// Maps sitemap URLs onto a flat-file page cache
///
/// The cache mirrors the site's URL layout below `cache_dir`, optionally with
/// an index file in every folder (`/about/` → `<cache_dir>/about/index.html`).
/// Probes only check for existence; nothing is read or written.
#[derive(Debug, Clone)]
pub struct CacheProbe {
    cache_dir: PathBuf,
    url_base: Option<String>,
    cache_file: String,
}

impl CacheProbe {
    pub fn new(config: &LocalCacheConfig) -> Self {
        Self {
            cache_dir: config.cache_dir.clone(),
            url_base: config.url_base.clone(),
            cache_file: config.cache_file.clone(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the part of `url` that is mirrored in the cache
    ///
    /// With a base configured this is the URL minus that prefix; a URL that
    /// doesn't start with the base is an error rather than a probe of some
    /// unrelated path. Without a base it is the URL's path component.
    pub fn relative_path<'u>(&self, url: &'u str) -> ProbeResult<Cow<'u, str>> {
        match &self.url_base {
            Some(base) => url
                .strip_prefix(base.as_str())
                .map(Cow::Borrowed)
                .ok_or_else(|| ProbeError::BaseMismatch {
                    url: url.to_string(),
                    base: base.clone(),
                }),
            None => {
                let parsed = Url::parse(url).map_err(|e| ProbeError::InvalidUrl {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
                Ok(Cow::Owned(parsed.path().to_string()))
            }
        }
    }

    /// Returns the filesystem path whose existence means `url` is cached
    pub fn probe_path(&self, url: &str) -> ProbeResult<PathBuf> {
        let relative = self.relative_path(url)?;
        let mut path = self.cache_dir.clone();

        for segment in relative.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(ProbeError::Traversal(url.to_string())),
                segment => path.push(segment),
            }
        }

        if !self.cache_file.is_empty() {
            path.push(&self.cache_file);
        }

        Ok(path)
    }

    /// Returns true if a cached copy of `url` exists (file or directory)
    pub fn is_primed(&self, url: &str) -> ProbeResult<bool> {
        let path = self.probe_path(url)?;
        let exists = path.exists();
        tracing::trace!("Probe {} -> {} ({})", url, path.display(), exists);
        Ok(exists)
    }
}
