//! Fingerprint comparison and lastmod resolution.

use chrono::NaiveDate;

use super::{CacheEntry, SitemapCache};

/// Resolve the `lastmod` date for a URL.
///
/// Returns the cached date when the cached fingerprint matches, otherwise
/// `today`.
pub fn resolve_last_modified(url: &str, fingerprint: &str, cache: &SitemapCache, today: NaiveDate) -> NaiveDate {
    match cache.get(url) {
        Some(entry) if entry.fingerprint == fingerprint => entry.last_modified,
        _ => today,
    }
}

/// Resolves lastmod dates against the previous run's cache and stages every
/// resolution for persistence.
#[derive(Debug)]
pub struct ChangeTracker {
    previous: SitemapCache,
    staged: SitemapCache,
    today: NaiveDate,
    changed: usize,
    unchanged: usize,
}

impl ChangeTracker {
    pub fn new(previous: SitemapCache, today: NaiveDate) -> Self {
        Self { previous, staged: SitemapCache::new(), today, changed: 0, unchanged: 0 }
    }

    /// Resolve and stage the lastmod for `url`.
    pub fn resolve(&mut self, url: &str, fingerprint: &str) -> NaiveDate {
        let last_modified = resolve_last_modified(url, fingerprint, &self.previous, self.today);

        if self.previous.get(url).is_some_and(|e| e.fingerprint == fingerprint) {
            self.unchanged += 1;
        } else {
            self.changed += 1;
        }

        self.staged.insert(url, CacheEntry { fingerprint: fingerprint.to_string(), last_modified });
        last_modified
    }

    /// Number of URLs that are new or whose content changed.
    pub fn changed(&self) -> usize {
        self.changed
    }

    pub fn unchanged(&self) -> usize {
        self.unchanged
    }

    /// The cache to persist: previous entries overlaid with everything staged.
    pub fn into_cache(self) -> SitemapCache {
        let mut merged = self.previous;
        merged.merge(self.staged);
        merged
    }
}
