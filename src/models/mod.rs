// src/models/mod.rs

//! Domain models for the crawler application.

mod article;
mod config;

// Re-export all public types
pub use article::{Article, TextSegment};
pub use config::{Config, CrawlerConfig, SiteConfig, StorageConfig};
