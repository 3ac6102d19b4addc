use serde::Deserialize;

use super::lenient::{self, first_non_empty};
use super::{Category, ItemId, SiteContext, SitemapItem, non_empty, slugify};
use crate::cache::hash::compute_fingerprint;

/// An editorial article from the content API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<ItemId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, rename = "content", deserialize_with = "lenient::text")]
    content_field: Option<String>,
    #[serde(default, rename = "body", deserialize_with = "lenient::text")]
    body_field: Option<String>,
    #[serde(default, rename = "featured_image", deserialize_with = "lenient::text")]
    featured_image_snake: Option<String>,
    #[serde(default, rename = "featuredImage", deserialize_with = "lenient::text")]
    featured_image_camel: Option<String>,
    #[serde(default, rename = "updated_at", deserialize_with = "lenient::text")]
    updated_at_snake: Option<String>,
    #[serde(default, rename = "updatedAt", deserialize_with = "lenient::text")]
    updated_at_camel: Option<String>,
    #[serde(default, rename = "published_at", deserialize_with = "lenient::text")]
    published_at_snake: Option<String>,
    #[serde(default, rename = "publishedAt", deserialize_with = "lenient::text")]
    published_at_camel: Option<String>,
}

impl Article {
    /// Article body; scanned for CDN-hosted images.
    pub fn content(&self) -> Option<&str> {
        first_non_empty(&[&self.content_field, &self.body_field])
    }

    pub fn featured_image(&self) -> Option<&str> {
        first_non_empty(&[&self.featured_image_snake, &self.featured_image_camel])
    }

    pub fn updated_at(&self) -> Option<&str> {
        first_non_empty(&[&self.updated_at_snake, &self.updated_at_camel])
    }

    pub fn published_at(&self) -> Option<&str> {
        first_non_empty(&[&self.published_at_snake, &self.published_at_camel])
    }

    /// Last edit time, falling back to the publication time.
    pub fn source_timestamp(&self) -> Option<&str> {
        self.updated_at().or_else(|| self.published_at())
    }
}

impl SitemapItem for Article {
    fn category(&self) -> Category {
        Category::Articles
    }

    /// Slug, then id, then a slug generated from the title.
    fn slug_or_id(&self) -> Option<String> {
        non_empty(self.slug.as_ref())
            .map(str::to_string)
            .or_else(|| self.id.as_ref().and_then(ItemId::as_segment))
            .or_else(|| non_empty(self.title.as_ref()).map(slugify).filter(|s| !s.is_empty()))
    }

    fn raw_images(&self, site: &SiteContext) -> Vec<String> {
        let mut images: Vec<String> = self.featured_image().map(str::to_string).into_iter().collect();
        if let Some(body) = self.content() {
            images.extend(site.cdn_images_in(body));
        }
        images
    }

    fn fingerprint(&self) -> String {
        let id = self.id.as_ref().map(ItemId::to_string).unwrap_or_default();

        compute_fingerprint(&[
            id.as_str(),
            self.slug.as_deref().unwrap_or_default(),
            self.title.as_deref().unwrap_or_default(),
            self.content().unwrap_or_default(),
            self.source_timestamp().unwrap_or_default(),
        ])
    }

    fn display_caption(&self) -> String {
        non_empty(self.title.as_ref()).unwrap_or("Article").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn site() -> SiteContext {
        SiteContext::new("https://www.example.com", "https://www.example.com/placeholder.jpg", "cdn.example.com")
            .unwrap()
    }

    fn article(value: serde_json::Value) -> Article {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_url_fallback_chain() {
        let site = site();
        let by_slug = article(json!({"id": 5, "slug": "ev-buying-guide", "title": "EV buying guide"}));
        assert_eq!(by_slug.url(&site).as_deref(), Some("https://www.example.com/articles/ev-buying-guide"));

        let by_id = article(json!({"id": 5, "title": "EV buying guide"}));
        assert_eq!(by_id.url(&site).as_deref(), Some("https://www.example.com/articles/5"));

        let by_title = article(json!({"title": "EV Buying Guide, 2024"}));
        assert_eq!(by_title.url(&site).as_deref(), Some("https://www.example.com/articles/ev-buying-guide-2024"));

        assert_eq!(article(json!({"title": "!!!"})).url(&site), None);
    }

    #[test]
    fn test_images_from_featured_and_body() {
        let a = article(json!({
            "title": "Detailing",
            "featuredImage": "https://cdn.example.com/hero.jpg",
            "body": "<img src=\"https://cdn.example.com/step1.jpg\"><img src=\"https://cdn.example.com/hero.jpg\">"
        }));
        let images = a.images(&site());
        let urls: Vec<&str> = images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["https://cdn.example.com/hero.jpg", "https://cdn.example.com/step1.jpg"]);
        assert!(images.iter().all(|i| i.caption == "Detailing"));
    }

    #[test]
    fn test_fingerprint_uses_published_when_not_updated() {
        let a = article(json!({"id": 1, "content": "x", "published_at": "2024-01-01"}));
        let b = article(json!({"id": 1, "content": "x", "updated_at": "2024-01-01"}));
        assert_eq!(a.fingerprint(), b.fingerprint());

        let edited = article(json!({"id": 1, "content": "y", "updated_at": "2024-01-01"}));
        assert_ne!(b.fingerprint(), edited.fingerprint());
    }

    #[test]
    fn test_both_spellings_present() {
        let a = article(json!({
            "id": 2,
            "content": "",
            "body": "text",
            "featured_image": "https://cdn.example.com/a.jpg",
            "featuredImage": "https://cdn.example.com/a.jpg",
            "updatedAt": "2024-03-01",
            "updated_at": "2024-03-01",
            "publishedAt": 1704067200
        }));
        assert_eq!(a.content(), Some("text"));
        assert_eq!(a.featured_image(), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(a.source_timestamp(), Some("2024-03-01"));
        assert_eq!(a.published_at(), Some("1704067200"));
    }
}
