//! Cache file persistence.
//!
//! The cache is read once at the start of a run and written once at the end.
//! Neither operation is fatal to a run; callers decide what to do with the
//! returned error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::SitemapCache;
use crate::Error;
use crate::sitemap::writer::write_atomic;

/// Location of the persisted cache file.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache file.
    ///
    /// A missing file is a cold start and yields an empty cache. An unreadable
    /// or malformed file is an error.
    pub fn load(&self) -> Result<SitemapCache, Error> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no sitemap cache found, starting cold");
                return Ok(SitemapCache::new());
            }
            Err(source) => return Err(Error::Cache { path: self.path.clone(), source }),
        };

        if raw.trim().is_empty() {
            return Ok(SitemapCache::new());
        }

        let cache: SitemapCache = serde_json::from_str(&raw)
            .map_err(|e| Error::CacheCorrupt { path: self.path.clone(), reason: e.to_string() })?;

        tracing::debug!(path = %self.path.display(), entries = cache.len(), "loaded sitemap cache");
        Ok(cache)
    }

    /// Write the cache file atomically.
    pub fn save(&self, cache: &SitemapCache) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(cache)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::Cache { path: parent.to_path_buf(), source })?;
        }

        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), entries = cache.len(), "saved sitemap cache");
        Ok(())
    }
}
