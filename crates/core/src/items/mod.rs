//! Sitemap item adapters.
//!
//! Each content category implements [`SitemapItem`], which fixes where its
//! canonical URL, images, caption and change fingerprint come from. The
//! document assembler and the pruner only ever talk to the trait.

mod accessory;
mod article;
mod lenient;
mod static_page;
mod vehicle;

use std::fmt;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

pub use accessory::Accessory;
pub use article::Article;
pub use static_page::{STATIC_PAGES, StaticPage, static_pages};
pub use vehicle::Vehicle;

use crate::config::AppConfig;
use crate::normalize::finalize_images;
use crate::sitemap::ChangeFreq;
use crate::Error;

/// Content category. Determines URL prefix, output document and crawl hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Vehicles,
    Articles,
    Accessories,
    Pages,
}

impl Category {
    /// Categories in document assembly order.
    pub const ALL: [Category; 4] = [Category::Vehicles, Category::Articles, Category::Accessories, Category::Pages];

    pub fn label(self) -> &'static str {
        match self {
            Category::Vehicles => "vehicles",
            Category::Articles => "articles",
            Category::Accessories => "accessories",
            Category::Pages => "pages",
        }
    }

    /// Path segment placed between the site root and the item slug.
    ///
    /// Static pages carry their own paths and have no prefix.
    pub fn path_segment(self) -> Option<&'static str> {
        match self {
            Category::Vehicles => Some("vehicles"),
            Category::Articles => Some("articles"),
            Category::Accessories => Some("accessories"),
            Category::Pages => None,
        }
    }

    /// Substring that identifies this category's item URLs in the cache.
    pub fn url_prefix(self) -> Option<String> {
        self.path_segment().map(|segment| format!("/{segment}/"))
    }

    pub fn document_name(self) -> &'static str {
        match self {
            Category::Vehicles => "sitemap-vehicles.xml",
            Category::Articles => "sitemap-articles.xml",
            Category::Accessories => "sitemap-accessories.xml",
            Category::Pages => "sitemap-pages.xml",
        }
    }

    pub fn changefreq(self) -> ChangeFreq {
        match self {
            Category::Vehicles => ChangeFreq::Daily,
            Category::Articles => ChangeFreq::Weekly,
            Category::Accessories => ChangeFreq::Weekly,
            Category::Pages => ChangeFreq::Monthly,
        }
    }

    pub fn priority(self) -> f32 {
        match self {
            Category::Vehicles => 0.8,
            Category::Articles => 0.7,
            Category::Accessories => 0.6,
            Category::Pages => 0.5,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Item identifier as delivered by the content API: numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl ItemId {
    /// The id as a URL segment, or `None` when it is blank.
    pub fn as_segment(&self) -> Option<String> {
        match self {
            ItemId::Number(n) => Some(n.to_string()),
            ItemId::Text(s) => non_empty(Some(s)).map(str::to_string),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// An image reference emitted as an `image:image` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    pub caption: String,
}

/// Site-wide values the adapters need to resolve URLs and images.
#[derive(Debug, Clone)]
pub struct SiteContext {
    root: String,
    placeholder_image: String,
    cdn_image_pattern: Regex,
}

impl SiteContext {
    pub fn new(site_url: &str, placeholder_image: &str, image_cdn_host: &str) -> Result<Self, Error> {
        let root = site_url.trim().trim_end_matches('/').to_string();
        if root.is_empty() {
            return Err(Error::InvalidInput("site URL must not be empty".into()));
        }

        let pattern = format!(r#"https://{}/[^\s"'<>()\]\[]+"#, regex::escape(image_cdn_host.trim()));
        let cdn_image_pattern =
            Regex::new(&pattern).map_err(|e| Error::InvalidInput(format!("image CDN host: {e}")))?;

        Ok(Self { root, placeholder_image: placeholder_image.trim().to_string(), cdn_image_pattern })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(&config.site_url, &config.placeholder_image, &config.image_cdn_host)
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn placeholder_image(&self) -> &str {
        &self.placeholder_image
    }

    /// Every CDN image URL appearing in free text, in order of appearance.
    pub fn cdn_images_in<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        self.cdn_image_pattern.find_iter(text).map(|m| m.as_str().to_string())
    }

    /// `{root}/{category segment}/{slug}` for prefixed categories.
    pub fn item_url(&self, category: Category, slug: &str) -> String {
        match category.path_segment() {
            Some(segment) => format!("{}/{}/{}", self.root, segment, slug),
            None => format!("{}/{}", self.root, slug.trim_start_matches('/')),
        }
    }
}

/// Per-category adapter used by pruning, change detection and assembly.
pub trait SitemapItem {
    fn category(&self) -> Category;

    /// Preferred URL segment: slug first, then id (then any category fallback).
    fn slug_or_id(&self) -> Option<String>;

    /// Image candidates before the shared image policy is applied.
    fn raw_images(&self, site: &SiteContext) -> Vec<String>;

    /// Digest over the fields that affect this item's sitemap entry.
    fn fingerprint(&self) -> String;

    /// Human-readable label used as image caption.
    fn display_caption(&self) -> String;

    /// Canonical absolute URL, or `None` when the item has no usable identity.
    fn url(&self, site: &SiteContext) -> Option<String> {
        self.slug_or_id().map(|slug| site.item_url(self.category(), &slug))
    }

    fn images(&self, site: &SiteContext) -> Vec<ImageRef> {
        let caption = self.display_caption();
        finalize_images(self.raw_images(site), site.placeholder_image())
            .into_iter()
            .map(|url| ImageRef { url, caption: caption.clone() })
            .collect()
    }

    fn changefreq(&self) -> ChangeFreq {
        self.category().changefreq()
    }

    fn priority(&self) -> f32 {
        self.category().priority()
    }
}

/// Trimmed, non-empty view of an optional string field.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Stable text for a scalar JSON field (price, year) in fingerprints.
pub(crate) fn scalar_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Lowercase, hyphen-separated slug for titles without a stored slug.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
