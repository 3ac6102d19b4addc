//! Sitemap document assembly and output.
//!
//! - `document`: XML rendering for `urlset` and `sitemapindex` documents
//! - `writer`: atomic writes to the primary and mirror output directories

pub mod document;
pub mod writer;

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;

pub use document::{IndexEntry, UrlEntry, render_index, render_urlset};
pub use writer::{OutputWriter, WrittenDocument, write_atomic};

use crate::cache::ChangeTracker;
use crate::items::{Category, SiteContext, SitemapItem};

/// File name of the sitemap index document.
pub const INDEX_DOCUMENT: &str = "sitemap.xml";

/// `changefreq` hint values from the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

/// Build `<url>` entries for one category, in input order.
///
/// Each item's lastmod is resolved through `tracker`, which also stages the
/// new cache entry. Items without a canonical URL and repeated URLs are
/// skipped.
pub fn assemble_entries<I: SitemapItem>(items: &[I], site: &SiteContext, tracker: &mut ChangeTracker) -> Vec<UrlEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(items.len());

    for item in items {
        let Some(loc) = item.url(site) else {
            tracing::warn!(category = %item.category(), caption = %item.display_caption(), "item has no slug or id, skipping");
            continue;
        };

        if !seen.insert(loc.clone()) {
            tracing::warn!(category = %item.category(), url = %loc, "duplicate URL, keeping first occurrence");
            continue;
        }

        let lastmod = tracker.resolve(&loc, &item.fingerprint());
        entries.push(UrlEntry {
            loc,
            lastmod,
            changefreq: item.changefreq(),
            priority: item.priority(),
            images: item.images(site),
        });
    }

    entries
}

/// Index entries for every category document present in `dir`.
///
/// Existence is checked on disk so a document that failed to write is never
/// advertised.
pub fn index_entries(site: &SiteContext, dir: &Path, today: NaiveDate) -> Vec<IndexEntry> {
    Category::ALL
        .iter()
        .map(|category| category.document_name())
        .filter(|name| dir.join(name).is_file())
        .map(|name| IndexEntry { loc: format!("{}/{}", site.root(), name), lastmod: today })
        .collect()
}
