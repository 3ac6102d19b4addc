//! One sitemap synchronization run.
//!
//! Steps, in order:
//! 1. Load the previous cache (missing or corrupt degrades to empty)
//! 2. Fetch vehicles, articles and accessories concurrently
//! 3. De-list per category (vehicles, accessories, articles), skipping any
//!    category whose fetch failed
//! 4. Prune each collection, static pages included
//! 5. Assemble and write one document per category, then the index
//! 6. Persist the merged cache (failure is logged and ignored)

use chrono::NaiveDate;
use sitemap_sync_client::{ContentError, ContentSource, PruningStats, ReachabilityChecker, UrlProbe, prune};
use sitemap_sync_core::cache::SitemapCache;
use sitemap_sync_core::items::static_pages;
use sitemap_sync_core::sitemap::{INDEX_DOCUMENT, assemble_entries, index_entries, render_index, render_urlset};
use sitemap_sync_core::{
    AppConfig, CacheStore, Category, ChangeTracker, DelistingStats, OutputWriter, SiteContext, SitemapItem,
    WrittenDocument, delist_items,
};

use crate::error::RunError;

/// What happened to one category during the run.
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub category: Category,
    /// Items returned by the content source (after its own filtering).
    pub fetched: usize,
    pub fetch_error: Option<String>,
    pub pruning: PruningStats,
    /// `<url>` entries written.
    pub entries: usize,
    /// `None` when the category was empty and no document was written.
    pub document: Option<WrittenDocument>,
}

/// Result object for a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub date: NaiveDate,
    /// In document order: vehicles, articles, accessories, pages.
    pub categories: Vec<CategoryReport>,
    pub delisting: DelistingStats,
    pub index: WrittenDocument,
    pub changed: usize,
    pub unchanged: usize,
    pub cache_entries: usize,
    pub cache_saved: bool,
}

impl RunReport {
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Pruning counters across all categories.
    pub fn pruning_totals(&self) -> PruningStats {
        self.categories.iter().fold(PruningStats::default(), |mut total, c| {
            total.absorb(c.pruning.clone());
            total
        })
    }
}

/// Values shared by every category stage.
struct RunContext<'a> {
    config: &'a AppConfig,
    site: &'a SiteContext,
    probe: Option<&'a dyn UrlProbe>,
}

/// A fetched collection; a failed fetch is an empty collection plus its error.
struct Fetched<T> {
    category: Category,
    items: Vec<T>,
    error: Option<ContentError>,
}

impl<T: SitemapItem> Fetched<T> {
    fn new(category: Category, result: Result<Vec<T>, ContentError>) -> Self {
        match result {
            Ok(items) => {
                tracing::info!(category = %category, count = items.len(), "fetched collection");
                Self { category, items, error: None }
            }
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "fetch failed, continuing with an empty collection");
                Self { category, items: Vec::new(), error: Some(e) }
            }
        }
    }

    /// De-list against this collection, unless its fetch failed.
    fn delist(&self, cache: &mut SitemapCache, site: &SiteContext, stats: &mut DelistingStats) {
        if self.error.is_some() {
            tracing::warn!(category = %self.category, "fetch failed, keeping cached entries");
            stats.skip(self.category);
            return;
        }
        stats.record(delist_items(cache, self.category, &self.items, site));
    }

    async fn prune(self, ctx: &RunContext<'_>) -> Pruned<T> {
        let fetched = self.items.len();
        let fetch_error = self.error.map(|e| e.to_string());

        let (items, pruning) = if ctx.config.prune_enabled {
            let outcome = prune(self.items, |item| item.url(ctx.site), ctx.probe, ctx.config.concurrency).await;
            (outcome.kept, outcome.stats)
        } else {
            let stats = PruningStats { checked: fetched, kept: fetched, ..Default::default() };
            (self.items, stats)
        };

        if pruning.pruned() > 0 {
            tracing::info!(category = %self.category, checked = pruning.checked, pruned = pruning.pruned(), "pruned URLs");
        }

        Pruned { category: self.category, fetched, fetch_error, items, pruning }
    }
}

/// A collection that passed pruning, ready for assembly.
struct Pruned<T> {
    category: Category,
    fetched: usize,
    fetch_error: Option<String>,
    items: Vec<T>,
    pruning: PruningStats,
}

impl<T: SitemapItem> Pruned<T> {
    /// Write the category document, or retire it when there are no entries.
    fn write(
        self, writer: &OutputWriter, site: &SiteContext, tracker: &mut ChangeTracker,
    ) -> Result<CategoryReport, RunError> {
        let entries = assemble_entries(&self.items, site, tracker);
        let name = self.category.document_name();

        let document = if entries.is_empty() {
            tracing::info!(category = %self.category, "no entries, skipping document");
            writer.retire(name);
            None
        } else {
            Some(writer.write(name, &render_urlset(&entries))?)
        };

        Ok(CategoryReport {
            category: self.category,
            fetched: self.fetched,
            fetch_error: self.fetch_error,
            pruning: self.pruning,
            entries: entries.len(),
            document,
        })
    }
}

fn load_cache(store: &CacheStore) -> SitemapCache {
    match store.load() {
        Ok(cache) => cache,
        Err(e) => {
            tracing::warn!(path = %store.path().display(), code = e.code(), error = %e, "ignoring unreadable cache");
            SitemapCache::new()
        }
    }
}

/// Execute one run against `source`, dating changes with `today`.
pub async fn run(config: &AppConfig, source: &dyn ContentSource, today: NaiveDate) -> Result<RunReport, RunError> {
    let site = SiteContext::from_config(config)?;
    let store = CacheStore::new(&config.cache_path);
    let mut cache = load_cache(&store);

    let (vehicles, articles, accessories) = tokio::join!(source.vehicles(), source.articles(), source.accessories());
    let vehicles = Fetched::new(Category::Vehicles, vehicles);
    let articles = Fetched::new(Category::Articles, articles);
    let accessories = Fetched::new(Category::Accessories, accessories);

    let mut delisting = DelistingStats::default();
    vehicles.delist(&mut cache, &site, &mut delisting);
    accessories.delist(&mut cache, &site, &mut delisting);
    articles.delist(&mut cache, &site, &mut delisting);

    let pages = Fetched::new(Category::Pages, Ok(static_pages()));

    let checker = if config.prune_enabled && config.check_reachability {
        Some(ReachabilityChecker::from_config(config).map_err(|e| RunError::ClientInit(e.to_string()))?)
    } else {
        None
    };
    let ctx = RunContext { config, site: &site, probe: checker.as_ref().map(|c| c as &dyn UrlProbe) };

    let vehicles = vehicles.prune(&ctx).await;
    let articles = articles.prune(&ctx).await;
    let accessories = accessories.prune(&ctx).await;
    let pages = pages.prune(&ctx).await;

    let writer = OutputWriter::new(&config.output_dir, config.secondary_output_dir.clone());
    writer.prepare()?;
    let mut tracker = ChangeTracker::new(cache, today);

    let categories = vec![
        vehicles.write(&writer, &site, &mut tracker)?,
        articles.write(&writer, &site, &mut tracker)?,
        accessories.write(&writer, &site, &mut tracker)?,
        pages.write(&writer, &site, &mut tracker)?,
    ];

    let index = writer.write(INDEX_DOCUMENT, &render_index(&index_entries(&site, writer.primary_dir(), today)))?;

    let (changed, unchanged) = (tracker.changed(), tracker.unchanged());
    let cache = tracker.into_cache();
    let cache_saved = match store.save(&cache) {
        Ok(()) => {
            tracing::info!(path = %store.path().display(), entries = cache.len(), "saved sitemap cache");
            true
        }
        Err(e) => {
            tracing::warn!(path = %store.path().display(), code = e.code(), error = %e, "failed to save sitemap cache");
            false
        }
    };

    Ok(RunReport { date: today, categories, delisting, index, changed, unchanged, cache_entries: cache.len(), cache_saved })
}
