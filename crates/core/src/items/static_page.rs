use super::{Category, SiteContext, SitemapItem, ImageRef};
use crate::cache::hash::compute_fingerprint;
use crate::sitemap::ChangeFreq;

/// A hand-maintained page that is not backed by the content API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticPage {
    /// Path below the site root, without a leading slash. Empty for home.
    pub path: &'static str,
    pub title: &'static str,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// Fixed set of top-level pages.
pub const STATIC_PAGES: &[StaticPage] = &[
    StaticPage { path: "", title: "Home", changefreq: ChangeFreq::Daily, priority: 1.0 },
    StaticPage { path: "vehicles", title: "Vehicles for sale", changefreq: ChangeFreq::Daily, priority: 0.9 },
    StaticPage { path: "articles", title: "Articles", changefreq: ChangeFreq::Weekly, priority: 0.7 },
    StaticPage { path: "accessories", title: "Accessories", changefreq: ChangeFreq::Weekly, priority: 0.7 },
    StaticPage { path: "sell", title: "Sell your vehicle", changefreq: ChangeFreq::Monthly, priority: 0.6 },
    StaticPage { path: "finance", title: "Finance", changefreq: ChangeFreq::Monthly, priority: 0.5 },
    StaticPage { path: "about", title: "About us", changefreq: ChangeFreq::Yearly, priority: 0.3 },
    StaticPage { path: "contact", title: "Contact", changefreq: ChangeFreq::Yearly, priority: 0.3 },
];

/// The static pages included in this run.
pub fn static_pages() -> Vec<StaticPage> {
    STATIC_PAGES.to_vec()
}

impl SitemapItem for StaticPage {
    fn category(&self) -> Category {
        Category::Pages
    }

    fn slug_or_id(&self) -> Option<String> {
        Some(self.path.to_string())
    }

    fn raw_images(&self, _site: &SiteContext) -> Vec<String> {
        Vec::new()
    }

    /// Static pages are listed without image blocks.
    fn images(&self, _site: &SiteContext) -> Vec<ImageRef> {
        Vec::new()
    }

    fn fingerprint(&self) -> String {
        compute_fingerprint(&[self.path, self.title])
    }

    fn display_caption(&self) -> String {
        self.title.to_string()
    }

    fn changefreq(&self) -> ChangeFreq {
        self.changefreq
    }

    fn priority(&self) -> f32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_page_urls() {
        let site = SiteContext::new("https://www.example.com", "https://www.example.com/p.jpg", "cdn.example.com")
            .unwrap();
        let urls: Vec<String> = static_pages().iter().filter_map(|p| p.url(&site)).collect();
        assert_eq!(urls[0], "https://www.example.com/");
        assert!(urls.contains(&"https://www.example.com/vehicles".to_string()));
        assert_eq!(urls.len(), STATIC_PAGES.len());
    }

    #[test]
    fn test_listing_page_is_outside_vehicle_prefix() {
        let site = SiteContext::new("https://www.example.com", "https://www.example.com/p.jpg", "cdn.example.com")
            .unwrap();
        let listing = STATIC_PAGES[1].url(&site).unwrap();
        let prefix = Category::Vehicles.url_prefix().unwrap();
        assert!(!listing.contains(&prefix));
    }

    #[test]
    fn test_static_pages_have_no_images() {
        let site = SiteContext::new("https://www.example.com", "https://www.example.com/p.jpg", "cdn.example.com")
            .unwrap();
        assert!(STATIC_PAGES[0].images(&site).is_empty());
    }
}
