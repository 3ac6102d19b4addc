//! End-of-run summary printed to stdout.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::run::RunReport;

/// Per-category row of the summary.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: &'static str,
    pub fetched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
    /// `None` when de-listing was skipped or does not apply.
    pub delisted: Option<usize>,
    pub pruned: usize,
    pub entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

/// Serializable view of a [`RunReport`].
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub date: String,
    pub categories: Vec<CategorySummary>,
    pub pruned_by_reason: BTreeMap<&'static str, usize>,
    /// Pruning failures caused by timeouts or network errors.
    pub pruned_transient: usize,
    pub pruned_samples: Vec<String>,
    pub delisted_total: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub index: String,
    pub cache_entries: usize,
    pub cache_saved: bool,
}

impl From<&RunReport> for RunSummary {
    fn from(report: &RunReport) -> Self {
        let delisted = report.delisting.by_category();
        let pruning = report.pruning_totals();

        let categories = report
            .categories
            .iter()
            .map(|c| CategorySummary {
                category: c.category.label(),
                fetched: c.fetched,
                fetch_error: c.fetch_error.clone(),
                delisted: delisted.get(&c.category).copied(),
                pruned: c.pruning.pruned(),
                entries: c.entries,
                document: c.document.as_ref().map(|d| d.primary.display().to_string()),
            })
            .collect();

        Self {
            date: report.date.format("%Y-%m-%d").to_string(),
            categories,
            pruned_transient: pruning.transient,
            pruned_samples: pruning.samples.iter().map(ToString::to_string).collect(),
            pruned_by_reason: pruning.by_reason,
            delisted_total: report.delisting.total_removed(),
            changed: report.changed,
            unchanged: report.unchanged,
            index: report.index.primary.display().to_string(),
            cache_entries: report.cache_entries,
            cache_saved: report.cache_saved,
        }
    }
}

impl RunSummary {
    /// Plain-text rendering for terminals and CI logs.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Sitemap sync {}", self.date);

        for c in &self.categories {
            let delisted = c.delisted.map_or_else(|| "-".to_string(), |n| n.to_string());
            let _ = write!(
                out,
                "  {:<12} fetched {:>5}  delisted {:>4}  pruned {:>4}  written {:>5}",
                c.category, c.fetched, delisted, c.pruned, c.entries
            );
            match (&c.fetch_error, &c.document) {
                (Some(error), _) => {
                    let _ = writeln!(out, "  (fetch failed: {error})");
                }
                (None, None) => {
                    let _ = writeln!(out, "  (no document)");
                }
                (None, Some(_)) => out.push('\n'),
            }
        }

        let _ = writeln!(out, "  lastmod: {} changed, {} unchanged", self.changed, self.unchanged);
        let _ = writeln!(out, "  de-listed: {}", self.delisted_total);

        if !self.pruned_by_reason.is_empty() {
            let reasons: Vec<String> = self.pruned_by_reason.iter().map(|(r, n)| format!("{r}={n}")).collect();
            let _ = writeln!(out, "  pruned by reason: {}", reasons.join(", "));
            if self.pruned_transient > 0 {
                let _ = writeln!(out, "  {} URL(s) pruned on timeouts or network errors", self.pruned_transient);
            }
            for sample in &self.pruned_samples {
                let _ = writeln!(out, "    - {sample}");
            }
        }

        let _ = writeln!(out, "  index: {}", self.index);
        let cache = if self.cache_saved { "saved" } else { "NOT saved" };
        let _ = writeln!(out, "  cache: {} entries, {cache}", self.cache_entries);
        out
    }
}

/// Print the summary to stdout, as JSON when `json` is set.
pub fn print(report: &RunReport, json: bool) -> Result<(), serde_json::Error> {
    let summary = RunSummary::from(report);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render_text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        RunSummary {
            date: "2024-03-09".into(),
            categories: vec![
                CategorySummary {
                    category: "vehicles",
                    fetched: 12,
                    fetch_error: None,
                    delisted: Some(2),
                    pruned: 1,
                    entries: 11,
                    document: Some("public/sitemap-vehicles.xml".into()),
                },
                CategorySummary {
                    category: "accessories",
                    fetched: 0,
                    fetch_error: Some("HTTP error: 503".into()),
                    delisted: None,
                    pruned: 0,
                    entries: 0,
                    document: None,
                },
            ],
            pruned_by_reason: BTreeMap::from([("not_found", 1)]),
            pruned_transient: 0,
            pruned_samples: vec!["https://x.co/vehicles/gone: not found (404)".into()],
            delisted_total: 2,
            changed: 3,
            unchanged: 8,
            index: "public/sitemap.xml".into(),
            cache_entries: 19,
            cache_saved: true,
        }
    }

    #[test]
    fn test_render_text() {
        let text = summary().render_text();
        assert!(text.starts_with("Sitemap sync 2024-03-09"));
        assert!(text.contains("vehicles"));
        assert!(text.contains("(fetch failed: HTTP error: 503)"));
        assert!(text.contains("pruned by reason: not_found=1"));
        assert!(text.contains("- https://x.co/vehicles/gone: not found (404)"));
        assert!(text.contains("cache: 19 entries, saved"));
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let json = serde_json::to_value(summary()).unwrap();
        assert_eq!(json["categories"][0]["delisted"], 2);
        assert!(json["categories"][1].get("document").is_none());
        assert_eq!(json["categories"][1]["delisted"], serde_json::Value::Null);
        assert_eq!(json["pruned_by_reason"]["not_found"], 1);
    }
}
