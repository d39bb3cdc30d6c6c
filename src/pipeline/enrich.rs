//! Rate-limited article body fetching.
//!
//! Detail pages are fetched strictly one at a time, with the configured
//! delay both before and after every request. The pacing is deliberate
//! backpressure towards the source site, not an accidental limitation.

use std::time::Duration;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::furigana;
use crate::models::{Article, SiteConfig};
use crate::utils::http;

/// Fetches article bodies for the working set.
pub struct ContentFetcher {
    client: reqwest::Client,
    body_selector: String,
    delay: Duration,
}

impl ContentFetcher {
    /// Create a content fetcher. Tests pass `Duration::ZERO` as the delay.
    pub fn new(client: reqwest::Client, site: &SiteConfig, delay: Duration) -> Self {
        Self {
            client,
            body_selector: site.body_selector.clone(),
            delay,
        }
    }

    /// Enrich every article in the working set, in order.
    ///
    /// A fetch or parse failure drops that one article with a warning;
    /// the rest of the batch continues.
    pub async fn enrich_all(&self, working: Vec<Article>) -> Vec<Article> {
        let mut enriched = Vec::with_capacity(working.len());

        for mut article in working {
            self.pause().await;
            let result = self.fetch_body(&article.url).await;
            self.pause().await;

            match result {
                Ok(body) => {
                    let segments = furigana::extract_segments(&body);
                    article.content = Some(furigana::plain_text(&segments));
                    article.content_segments = Some(segments);
                    enriched.push(article);
                }
                Err(e) => {
                    log::warn!("Skipping article {} ({}): {}", article.id, article.url, e);
                }
            }
        }

        enriched
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let html = http::fetch_text(&self.client, url).await?;
        extract_body(&html, &self.body_selector)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Extract body text from an article page.
///
/// Joins the text of every element matching the body selector. A page
/// with no matching text blocks is a parse failure for that article.
pub fn extract_body(html: &str, body_selector: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse(body_selector)
        .map_err(|e| AppError::selector(body_selector, format!("{e:?}")))?;

    let blocks: Vec<String> = document
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if blocks.is_empty() {
        return Err(AppError::crawl(body_selector, "no body text blocks matched"));
    }

    Ok(blocks.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY_SELECTOR: &str = "#main .main-text p";

    #[test]
    fn test_extract_body_joins_blocks() {
        let html = r#"
            <div id="main"><div class="main-text">
                <p>動物園（どうぶつえん）で</p>
                <p>パンダが生まれた。</p>
            </div></div>
        "#;
        let body = extract_body(html, BODY_SELECTOR).unwrap();
        assert_eq!(body, "動物園（どうぶつえん）で\nパンダが生まれた。");
    }

    #[test]
    fn test_extract_body_skips_empty_blocks() {
        let html = r#"
            <div id="main"><div class="main-text">
                <p>   </p>
                <p>本文。</p>
            </div></div>
        "#;
        let body = extract_body(html, BODY_SELECTOR).unwrap();
        assert_eq!(body, "本文。");
    }

    #[test]
    fn test_extract_body_no_match_is_error() {
        let html = "<div><p>elsewhere</p></div>";
        assert!(extract_body(html, BODY_SELECTOR).is_err());
    }

    #[test]
    fn test_extracted_body_feeds_furigana() {
        let html = r#"<div id="main"><div class="main-text"><p>新聞（しんぶん）を読む</p></div></div>"#;
        let body = extract_body(html, BODY_SELECTOR).unwrap();
        let segments = furigana::extract_segments(&body);
        assert_eq!(furigana::plain_text(&segments), "新聞を読む");
        assert_eq!(segments[0].reading.as_deref(), Some("しんぶん"));
    }
}
