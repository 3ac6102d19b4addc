use serde::Deserialize;
use serde_json::Value;

use super::lenient::{self, first_non_empty};
use super::{Category, ItemId, SiteContext, SitemapItem, non_empty, scalar_text};
use crate::cache::hash::compute_fingerprint;
use crate::normalize::{image_urls_from_value, normalize_features};

/// A listed vehicle from the content API.
///
/// Fields the API spells both ways are read separately and resolved through
/// accessors, first non-empty spelling winning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vehicle {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<ItemId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    /// Feature list in any of the shapes handled by [`normalize_features`].
    #[serde(default)]
    pub features: Option<Value>,
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
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

impl Vehicle {
    pub fn updated_at(&self) -> Option<&str> {
        first_non_empty(&[&self.updated_at_snake, &self.updated_at_camel])
    }

    pub fn is_active(&self) -> Option<bool> {
        self.is_active_snake.or(self.is_active_camel)
    }

    /// Whether the listing should appear in the sitemap.
    ///
    /// Records without any activity flag are assumed to be pre-filtered by
    /// the API.
    pub fn is_listed(&self) -> bool {
        if self.is_active() == Some(false) {
            return false;
        }
        match non_empty(self.status.as_ref()) {
            Some(status) => status.eq_ignore_ascii_case("active"),
            None => true,
        }
    }

    pub fn normalized_features(&self) -> Vec<String> {
        normalize_features(self.features.as_ref())
    }
}

impl SitemapItem for Vehicle {
    fn category(&self) -> Category {
        Category::Vehicles
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
        let features = self.normalized_features();
        let id = self.id.as_ref().map(ItemId::to_string).unwrap_or_default();
        let year = scalar_text(self.year.as_ref());
        let price = scalar_text(self.price.as_ref());
        let count = features.len().to_string();

        let mut fields: Vec<&str> = vec![
            id.as_str(),
            self.slug.as_deref().unwrap_or_default(),
            self.title.as_deref().unwrap_or_default(),
            self.make.as_deref().unwrap_or_default(),
            self.model.as_deref().unwrap_or_default(),
            year.as_str(),
            price.as_str(),
            count.as_str(),
        ];
        fields.extend(features.iter().map(String::as_str));
        fields.push(self.updated_at().unwrap_or_default());

        compute_fingerprint(&fields)
    }

    fn display_caption(&self) -> String {
        if let Some(title) = non_empty(self.title.as_ref()) {
            return title.to_string();
        }

        let year = scalar_text(self.year.as_ref());
        let parts: Vec<&str> = [Some(year.as_str()), non_empty(self.make.as_ref()), non_empty(self.model.as_ref())]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            match &self.id {
                Some(id) => format!("Vehicle {id}"),
                None => "Vehicle".to_string(),
            }
        } else {
            parts.join(" ")
        }
    }
}
