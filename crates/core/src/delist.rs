//! Removal of cache entries for items that are no longer listed.
//!
//! Each pass is scoped to one category's URL prefix, so cleaning up vehicles
//! never touches article or accessory entries.

use std::collections::{BTreeMap, HashSet};

use crate::cache::SitemapCache;
use crate::items::{Category, SiteContext, SitemapItem};

/// Remove every cache key containing `prefix` that is not in `active_urls`.
///
/// Returns the removed URLs in cache order.
pub fn delist(cache: &mut SitemapCache, active_urls: &HashSet<String>, prefix: &str) -> Vec<String> {
    let stale: Vec<String> = cache
        .urls()
        .filter(|url| url.contains(prefix) && !active_urls.contains(*url))
        .map(str::to_string)
        .collect();

    for url in &stale {
        cache.remove(url);
    }

    stale
}

/// Result of de-listing one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelistOutcome {
    pub category: Category,
    pub removed: Vec<String>,
}

/// De-list one category against its currently active items.
///
/// An empty active set clears the whole category. Categories without a URL
/// prefix (static pages) are left alone.
pub fn delist_items<I: SitemapItem>(
    cache: &mut SitemapCache, category: Category, active: &[I], site: &SiteContext,
) -> DelistOutcome {
    let Some(prefix) = category.url_prefix() else {
        return DelistOutcome { category, removed: Vec::new() };
    };

    let active_urls: HashSet<String> = active.iter().filter_map(|item| item.url(site)).collect();
    let removed = delist(cache, &active_urls, &prefix);

    if removed.is_empty() {
        tracing::debug!(category = %category, "no de-listed entries");
    } else {
        tracing::info!(category = %category, removed = removed.len(), "removed de-listed cache entries");
    }

    DelistOutcome { category, removed }
}

/// Per-category de-listing results for the run summary.
#[derive(Debug, Clone, Default)]
pub struct DelistingStats {
    pub outcomes: Vec<DelistOutcome>,
    /// Categories whose fetch failed, so de-listing was not attempted.
    pub skipped: Vec<Category>,
}

impl DelistingStats {
    pub fn record(&mut self, outcome: DelistOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn skip(&mut self, category: Category) {
        self.skipped.push(category);
    }

    pub fn total_removed(&self) -> usize {
        self.outcomes.iter().map(|o| o.removed.len()).sum()
    }

    pub fn by_category(&self) -> BTreeMap<Category, usize> {
        self.outcomes.iter().map(|o| (o.category, o.removed.len())).collect()
    }
}
