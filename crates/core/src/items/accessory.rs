use serde::Deserialize;
use serde_json::Value;

use super::lenient::{self, first_non_empty};
use super::{Category, ItemId, SiteContext, SitemapItem, non_empty, scalar_text};
use crate::cache::hash::compute_fingerprint;
use crate::normalize::image_urls_from_value;

/// An accessory listing from the content API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Accessory {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<ItemId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub slug: Option<String>,
    #[serde(default, rename = "name", deserialize_with = "lenient::text")]
    name_field: Option<String>,
    #[serde(default, rename = "title", deserialize_with = "lenient::text")]
    title_field: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub images: Option<Value>,
    #[serde(default, rename = "updated_at", deserialize_with = "lenient::text")]
    updated_at_snake: Option<String>,
    #[serde(default, rename = "updatedAt", deserialize_with = "lenient::text")]
    updated_at_camel: Option<String>,
    #[serde(default, rename = "is_active", deserialize_with = "lenient::flag")]
    is_active_snake: Option<bool>,
    #[serde(default, rename = "isActive", deserialize_with = "lenient::flag")]
    is_active_camel: Option<bool>,
    /// Moderation status; only `approved` listings are published.
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

impl Accessory {
    /// Listing name, falling back to `title`.
    pub fn name(&self) -> Option<&str> {
        first_non_empty(&[&self.name_field, &self.title_field])
    }

    pub fn updated_at(&self) -> Option<&str> {
        first_non_empty(&[&self.updated_at_snake, &self.updated_at_camel])
    }

    pub fn is_active(&self) -> Option<bool> {
        self.is_active_snake.or(self.is_active_camel)
    }

    /// Active and approved. Absent flags mean the API already filtered.
    pub fn is_listed(&self) -> bool {
        if self.is_active() == Some(false) {
            return false;
        }
        match non_empty(self.status.as_ref()) {
            Some(status) => status.eq_ignore_ascii_case("approved"),
            None => true,
        }
    }
}

impl SitemapItem for Accessory {
    fn category(&self) -> Category {
        Category::Accessories
    }

    fn slug_or_id(&self) -> Option<String> {
        non_empty(self.slug.as_ref())
            .map(str::to_string)
            .or_else(|| self.id.as_ref().and_then(ItemId::as_segment))
    }

    fn raw_images(&self, _site: &SiteContext) -> Vec<String> {
        image_urls_from_value(self.images.as_ref())
    }

    fn fingerprint(&self) -> String {
        let id = self.id.as_ref().map(ItemId::to_string).unwrap_or_default();
        let price = scalar_text(self.price.as_ref());

        compute_fingerprint(&[
            id.as_str(),
            self.slug.as_deref().unwrap_or_default(),
            self.name().unwrap_or_default(),
            price.as_str(),
            self.updated_at().unwrap_or_default(),
        ])
    }

    fn display_caption(&self) -> String {
        match (self.name(), &self.id) {
            (Some(name), _) => name.to_string(),
            (None, Some(id)) => format!("Accessory {id}"),
            (None, None) => "Accessory".to_string(),
        }
    }
}
