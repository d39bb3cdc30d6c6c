//! Article list fetching and index-page parsing.
//!
//! Retrieves the news index page and turns its list markup into candidate
//! [`Article`] records. Advertisement items and administrative notices are
//! filtered out here, before any detail page is touched.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::furigana;
use crate::models::{Article, SiteConfig};
use crate::utils::http;
use crate::utils::time::parse_jst_datetime;
use crate::utils::url::{article_id, canonicalize};

/// Fetch the index page and parse it into candidate articles.
///
/// A network failure or non-2xx status aborts the whole run; there is no
/// partial recovery at this stage.
pub async fn fetch_index(client: &reqwest::Client, site: &SiteConfig) -> Result<Vec<Article>> {
    let html = http::fetch_text(client, &site.index_url).await?;
    parse_index(&html, site)
}

/// Parse index-page HTML into candidate articles.
///
/// Unusable rows (ads, excluded categories, missing title or link,
/// unparsable dates) are skipped; only a broken selector is an error.
pub fn parse_index(html: &str, site: &SiteConfig) -> Result<Vec<Article>> {
    let document = Html::parse_document(html);

    let list_sel = parse_selector(&site.list_selector)?;
    let title_sel = parse_selector(&site.title_selector)?;
    let link_sel = parse_selector(&site.link_selector)?;
    let date_sel = parse_selector(&site.date_selector)?;
    let category_sel = parse_selector(&site.category_selector)?;
    let preview_sel = parse_selector(&site.preview_selector)?;

    let mut articles = Vec::new();
    for item in document.select(&list_sel) {
        if is_advertisement(&item, &site.ad_id_prefix) {
            continue;
        }

        if let Some(article) = parse_item(
            &item,
            site,
            &title_sel,
            &link_sel,
            &date_sel,
            &category_sel,
            &preview_sel,
        ) {
            articles.push(article);
        }
    }

    Ok(articles)
}

/// Advertisement items carry a marker id, e.g. `<li id="ad_rect1">`.
fn is_advertisement(item: &ElementRef, ad_id_prefix: &str) -> bool {
    item.value()
        .attr("id")
        .is_some_and(|id| id.starts_with(ad_id_prefix))
}

fn parse_item(
    item: &ElementRef,
    site: &SiteConfig,
    title_sel: &Selector,
    link_sel: &Selector,
    date_sel: &Selector,
    category_sel: &Selector,
    preview_sel: &Selector,
) -> Option<Article> {
    let raw_title = select_text(item, title_sel)?;
    if raw_title.is_empty() {
        return None;
    }

    let raw_link = item
        .select(link_sel)
        .next()?
        .value()
        .attr(&site.link_attr)?;
    if raw_link.trim().is_empty() {
        return None;
    }

    let category = select_text(item, category_sel).unwrap_or_default();
    if site.excluded_categories.iter().any(|c| c == &category) {
        return None;
    }

    let raw_date = select_text(item, date_sel)?;
    let published_at = match parse_jst_datetime(&raw_date) {
        Ok(dt) => dt,
        Err(e) => {
            log::warn!("Skipping index item '{raw_title}': {e}");
            return None;
        }
    };

    let url = canonicalize(&site.origin, raw_link);
    let Some(id) = article_id(&url) else {
        log::warn!("Skipping index item '{raw_title}': no id in URL {url}");
        return None;
    };

    let title_segments = furigana::extract_segments(&raw_title);
    let title = furigana::plain_text(&title_segments);

    let raw_preview = select_text(item, preview_sel).unwrap_or_default();
    let preview_segments = furigana::extract_segments(&normalize_whitespace(&raw_preview));
    let preview = furigana::plain_text(&preview_segments);

    Some(Article {
        id,
        published_at,
        title,
        title_segments,
        url,
        category,
        preview,
        preview_segments,
        image_uri: None,
        voice_uri: None,
        content: None,
        content_segments: None,
    })
}

/// Collected, trimmed text of the first element matching `sel`.
fn select_text(item: &ElementRef, sel: &Selector) -> Option<String> {
    item.select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
