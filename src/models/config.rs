//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Source site URLs and markup selectors
    #[serde(default)]
    pub site: SiteConfig,

    /// Snapshot persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if Url::parse(&self.site.index_url).is_err() {
            return Err(AppError::validation("site.index_url is not a valid URL"));
        }
        match Url::parse(&self.site.origin) {
            Ok(u) if u.host_str().is_some() => {}
            _ => return Err(AppError::validation("site.origin must be an absolute URL")),
        }
        for (name, value) in [
            ("site.list_selector", &self.site.list_selector),
            ("site.title_selector", &self.site.title_selector),
            ("site.link_selector", &self.site.link_selector),
            ("site.date_selector", &self.site.date_selector),
            ("site.body_selector", &self.site.body_selector),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{name} is empty")));
            }
        }
        if self.storage.archive_retention_hours == 0 {
            return Err(AppError::validation(
                "storage.archive_retention_hours must be > 0",
            ));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay before and after each detail-page request, in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Source site URLs and CSS selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// News index page to crawl
    #[serde(default = "defaults::index_url")]
    pub index_url: String,

    /// Canonical origin used to absolutize article links
    #[serde(default = "defaults::origin")]
    pub origin: String,

    /// CSS selector for index list items
    #[serde(default = "defaults::list_selector")]
    pub list_selector: String,

    /// CSS selector for the title element within an item
    #[serde(default = "defaults::title_selector")]
    pub title_selector: String,

    /// CSS selector for the link element within an item
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    /// CSS selector for the date element within an item
    #[serde(default = "defaults::date_selector")]
    pub date_selector: String,

    /// CSS selector for the category element within an item
    #[serde(default = "defaults::category_selector")]
    pub category_selector: String,

    /// CSS selector for the preview element within an item
    #[serde(default = "defaults::preview_selector")]
    pub preview_selector: String,

    /// CSS selector for body text blocks on an article page
    #[serde(default = "defaults::body_selector")]
    pub body_selector: String,

    /// HTML attribute holding the article link
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Element id prefix marking advertisement items
    #[serde(default = "defaults::ad_id_prefix")]
    pub ad_id_prefix: String,

    /// Category labels excluded from the candidate list
    #[serde(default = "defaults::excluded_categories")]
    pub excluded_categories: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            index_url: defaults::index_url(),
            origin: defaults::origin(),
            list_selector: defaults::list_selector(),
            title_selector: defaults::title_selector(),
            link_selector: defaults::link_selector(),
            date_selector: defaults::date_selector(),
            category_selector: defaults::category_selector(),
            preview_selector: defaults::preview_selector(),
            body_selector: defaults::body_selector(),
            link_attr: defaults::link_attr(),
            ad_id_prefix: defaults::ad_id_prefix(),
            excluded_categories: defaults::excluded_categories(),
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// How long archived snapshots are kept, in hours
    #[serde(default = "defaults::archive_retention_hours")]
    pub archive_retention_hours: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            archive_retention_hours: defaults::archive_retention_hours(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn request_delay() -> u64 {
        2000
    }

    // Site defaults
    pub fn index_url() -> String {
        "https://mainichi.jp/maisho/".into()
    }
    pub fn origin() -> String {
        "https://mainichi.jp".into()
    }
    pub fn list_selector() -> String {
        "ul.list-typeD > li".into()
    }
    pub fn title_selector() -> String {
        "span.midashi".into()
    }
    pub fn link_selector() -> String {
        "a".into()
    }
    pub fn date_selector() -> String {
        "span.date".into()
    }
    pub fn category_selector() -> String {
        "span.category".into()
    }
    pub fn preview_selector() -> String {
        "p.txt".into()
    }
    pub fn body_selector() -> String {
        "#main .main-text p".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
    pub fn ad_id_prefix() -> String {
        "ad".into()
    }
    // Storage defaults
    pub fn archive_retention_hours() -> u64 {
        24
    }

    pub fn excluded_categories() -> Vec<String> {
        vec!["社告".into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.crawler.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_origin() {
        let mut config = Config::default();
        config.site.origin = "/maisho".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_retention() {
        let mut config = Config::default();
        config.storage.archive_retention_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            request_delay_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.crawler.request_delay_ms, 500);
        assert_eq!(config.crawler.timeout_secs, 10);
        assert_eq!(config.site.origin, "https://mainichi.jp");
        assert_eq!(config.storage.archive_retention_hours, 24);
    }
}
