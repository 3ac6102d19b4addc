//! Format checks applied to every sitemap URL before any request is made.

use super::PruneReason;

/// Characters that mark a query string. Sitemap URLs must be clean paths.
const QUERY_CHARS: [char; 3] = ['?', '&', '='];

/// Validate a candidate sitemap URL.
///
/// Checks, in order:
/// 1. Present and non-empty
/// 2. No leading/trailing whitespace
/// 3. `https://` scheme
/// 4. No `?`, `&` or `=`
/// 5. Parses as an absolute URL with a host
pub fn check_format(raw: Option<&str>) -> Result<url::Url, PruneReason> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Err(PruneReason::Missing);
    };

    if raw.trim() != raw {
        return Err(PruneReason::Whitespace);
    }

    if !raw.starts_with("https://") {
        return Err(PruneReason::NotHttps);
    }

    if raw.contains(QUERY_CHARS) {
        return Err(PruneReason::QueryString);
    }

    let parsed = url::Url::parse(raw).map_err(|e| PruneReason::Unparseable(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(PruneReason::Unparseable("missing host".into()));
    }

    Ok(parsed)
}
