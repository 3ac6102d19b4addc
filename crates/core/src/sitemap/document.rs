//! XML rendering for sitemap documents.
//!
//! Output follows the sitemap protocol 0.9 with the Google image extension.
//! All text nodes are escaped for `< > & " '`.

use chrono::NaiveDate;
use quick_xml::escape::escape;

use super::ChangeFreq;
use crate::items::ImageRef;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
    pub priority: f32,
    pub images: Vec<ImageRef>,
}

/// One `<sitemap>` element of the index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
}

fn lastmod(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Render a complete `urlset` document.
pub fn render_urlset(entries: &[UrlEntry]) -> String {
    let mut xml = String::with_capacity(256 + entries.len() * 384);
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}" xmlns:image="{IMAGE_NS}">"#));
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(entry.loc.as_str())));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod(entry.lastmod)));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.changefreq.as_str()));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));

        for image in &entry.images {
            xml.push_str("    <image:image>\n");
            xml.push_str(&format!("      <image:loc>{}</image:loc>\n", escape(image.url.as_str())));
            let caption = image.caption.trim();
            if !caption.is_empty() {
                xml.push_str(&format!("      <image:caption>{}</image:caption>\n", escape(caption)));
            }
            xml.push_str("    </image:image>\n");
        }

        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render a `sitemapindex` document.
pub fn render_index(entries: &[IndexEntry]) -> String {
    let mut xml = String::with_capacity(128 + entries.len() * 128);
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<sitemapindex xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <sitemap>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(entry.loc.as_str())));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod(entry.lastmod)));
        xml.push_str("  </sitemap>\n");
    }

    xml.push_str("</sitemapindex>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    fn entry(images: Vec<ImageRef>) -> UrlEntry {
        UrlEntry {
            loc: "https://x.co/vehicles/audi-a4".into(),
            lastmod: "2024-03-09".parse().unwrap(),
            changefreq: ChangeFreq::Daily,
            priority: 0.8,
            images,
        }
    }

    /// Collect the unescaped text of every element named `tag`.
    fn texts_of(xml: &str, tag: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut current = String::new();
        let mut found = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => current = String::from_utf8_lossy(e.name().as_ref()).to_string(),
                Ok(Event::Text(t)) if current == tag => found.push(t.unescape().unwrap().to_string()),
                Ok(Event::End(_)) => current.clear(),
                Ok(Event::Eof) => break,
                Err(e) => panic!("malformed XML: {e}"),
                _ => {}
            }
        }
        found
    }

    #[test]
    fn test_render_urlset_fields() {
        let xml = render_urlset(&[entry(vec![])]);
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"xmlns="http://www.sitemaps.org/schemas/sitemap/0.9""#));
        assert!(xml.contains(r#"xmlns:image="http://www.google.com/schemas/sitemap-image/1.1""#));
        assert_eq!(texts_of(&xml, "loc"), vec!["https://x.co/vehicles/audi-a4"]);
        assert_eq!(texts_of(&xml, "lastmod"), vec!["2024-03-09"]);
        assert_eq!(texts_of(&xml, "changefreq"), vec!["daily"]);
        assert_eq!(texts_of(&xml, "priority"), vec!["0.8"]);
    }

    #[test]
    fn test_caption_escaping() {
        let caption = r#"Tom's "Best" <Deals> & more"#;
        let xml = render_urlset(&[entry(vec![ImageRef { url: "https://cdn.x.co/1.jpg".into(), caption: caption.into() }])]);

        assert!(xml.contains("Tom&apos;s &quot;Best&quot; &lt;Deals&gt; &amp; more"));
        assert_eq!(texts_of(&xml, "image:caption"), vec![caption]);
        assert_eq!(texts_of(&xml, "image:loc"), vec!["https://cdn.x.co/1.jpg"]);
    }

    #[test]
    fn test_blank_caption_omitted() {
        let xml = render_urlset(&[entry(vec![ImageRef { url: "https://cdn.x.co/1.jpg".into(), caption: " ".into() }])]);
        assert!(xml.contains("<image:loc>"));
        assert!(!xml.contains("<image:caption>"));
    }

    #[test]
    fn test_render_empty_urlset_is_well_formed() {
        let xml = render_urlset(&[]);
        assert!(texts_of(&xml, "loc").is_empty());
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_render_index() {
        let xml = render_index(&[
            IndexEntry { loc: "https://x.co/sitemap-vehicles.xml".into(), lastmod: "2024-03-09".parse().unwrap() },
            IndexEntry { loc: "https://x.co/sitemap-pages.xml".into(), lastmod: "2024-03-09".parse().unwrap() },
        ]);
        assert!(xml.contains("<sitemapindex"));
        assert_eq!(texts_of(&xml, "loc"), vec!["https://x.co/sitemap-vehicles.xml", "https://x.co/sitemap-pages.xml"]);
    }
}
