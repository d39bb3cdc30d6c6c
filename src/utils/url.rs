// src/utils/url.rs

//! URL canonicalization for article links.
//!
//! The index page mixes absolute links, root-relative links, and links
//! that repeat the site domain without a scheme. All of them collapse to
//! one canonical `{origin}/{path}` form so ids and dedup stay stable.

use url::Url;

/// Host part of an origin URL, lowercased.
fn origin_host(origin: &str) -> Option<String> {
    Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Normalize an article link against the canonical origin.
///
/// # Examples
/// ```
/// use maisho_crawler::utils::url::canonicalize;
///
/// let origin = "https://mainichi.jp";
/// assert_eq!(
///     canonicalize(origin, "/maisho/articles/20240315/012000c"),
///     "https://mainichi.jp/maisho/articles/20240315/012000c"
/// );
/// assert_eq!(
///     canonicalize(origin, "//mainichi.jp/maisho/articles/20240315/012000c"),
///     "https://mainichi.jp/maisho/articles/20240315/012000c"
/// );
/// ```
pub fn canonicalize(origin: &str, href: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let href = href.trim();
    let mut rest = href;

    if let Some(stripped) = rest
        .strip_prefix("https://")
        .or_else(|| rest.strip_prefix("http://"))
    {
        // Absolute link: canonicalize only when it points at our host.
        match origin_host(origin) {
            Some(host) if stripped.to_lowercase().starts_with(&host) => rest = stripped,
            _ => return href.to_string(),
        }
    }

    let rest = rest.trim_start_matches('/');

    let rest = match origin_host(origin) {
        Some(host) if rest.to_lowercase().starts_with(&host) => {
            rest[host.len()..].trim_start_matches('/')
        }
        _ => rest,
    };

    format!("{origin}/{rest}")
}

/// Derive the stable article id: the URL's last non-empty path segment.
pub fn article_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()
        .map(str::to_string)
}
