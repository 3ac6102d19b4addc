//! JSON-backed lastmod cache.
//!
//! This module keeps, per canonical URL, the fingerprint of the content that
//! was last published and the date it was first seen in that form. It supports:
//!
//! - Loading and saving the flat `url -> {fingerprint, lastModified}` file
//! - Fingerprint comparison that keeps `lastmod` stable for unchanged items
//! - Prefix-scoped removal of de-listed items

pub mod hash;
pub mod store;
pub mod tracker;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use store::CacheStore;
pub use tracker::ChangeTracker;

/// Cached state for one canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: String,
    #[serde(rename = "lastModified")]
    pub last_modified: NaiveDate,
}

/// In-memory view of the cache file, ordered by URL for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SitemapCache {
    entries: BTreeMap<String, CacheEntry>,
}

impl SitemapCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&CacheEntry> {
        self.entries.get(url)
    }

    pub fn insert(&mut self, url: impl Into<String>, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(url.into(), entry)
    }

    pub fn remove(&mut self, url: &str) -> Option<CacheEntry> {
        self.entries.remove(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Overlay `other` on top of this cache; entries in `other` win.
    pub fn merge(&mut self, other: SitemapCache) {
        self.entries.extend(other.entries);
    }
}

impl FromIterator<(String, CacheEntry)> for SitemapCache {
    fn from_iter<T: IntoIterator<Item = (String, CacheEntry)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
