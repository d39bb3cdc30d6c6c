//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── config.toml                          # Crawler configuration
//! ├── news-list.json                       # Current merged list (compact)
//! ├── news-list-formatted.json             # Same content, pretty-printed
//! └── archive/
//!     └── news-list_<timestamp>.json       # Pre-update snapshots
//! ```
//!
//! The primary file is replaced atomically (temp write + rename) and only
//! when its content actually changed; every replaced version stays
//! recoverable under `archive/` for the retention window.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Article;
use crate::storage::{ArticleStore, StoreOutcome};

/// Current merged list, compact JSON.
pub const LIST_FILE: &str = "news-list.json";

/// Pretty-printed copy of the current list.
pub const FORMATTED_FILE: &str = "news-list-formatted.json";

/// Directory holding timestamped snapshots.
pub const ARCHIVE_DIR: &str = "archive";

/// Timestamp format for archive file names (colon-free).
const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3fZ";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    retention: TimeDelta,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, retention_hours: u64) -> Self {
        Self {
            root_dir: root_dir.into(),
            retention: TimeDelta::hours(retention_hours as i64),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    fn archive_path(&self, now: DateTime<Utc>) -> PathBuf {
        let stamp = now.format(ARCHIVE_TIMESTAMP_FORMAT);
        self.path(ARCHIVE_DIR)
            .join(format!("news-list_{stamp}.json"))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn write_formatted(&self, articles: &[Article]) -> Result<()> {
        let pretty = serde_json::to_vec_pretty(articles)?;
        self.write_bytes(&self.path(FORMATTED_FILE), &pretty).await
    }
}

#[async_trait]
impl ArticleStore for LocalStorage {
    async fn load(&self) -> Result<Vec<Article>> {
        match self.read_bytes(LIST_FILE).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                log::info!("No {LIST_FILE} found; starting with an empty list");
                Ok(Vec::new())
            }
        }
    }

    async fn store(
        &self,
        articles: &[Article],
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<StoreOutcome> {
        let bytes = serde_json::to_vec(articles)?;
        let list_path = self.path(LIST_FILE);

        let tmp = self.path("news-list.json.tmp");
        self.write_bytes(&tmp, &bytes).await?;

        let current = self.read_bytes(LIST_FILE).await?;

        match current {
            Some(current) if !force => {
                if current == bytes {
                    tokio::fs::remove_file(&tmp).await?;
                    log::info!("No changes; {LIST_FILE} left untouched");
                    return Ok(StoreOutcome::Unchanged);
                }

                let archive = self.archive_path(now);
                self.ensure_dir(&archive).await?;
                tokio::fs::copy(&list_path, &archive).await?;
                log::info!("Archived previous list to {}", archive.display());

                tokio::fs::rename(&tmp, &list_path).await?;
                self.write_formatted(articles).await?;
                Ok(StoreOutcome::Written {
                    archived: Some(archive),
                })
            }
            // First run, or force refresh: direct overwrite, no
            // compare-and-archive. Force keeps this shortcut even when a
            // differing current file exists (upstream behavior).
            _ => {
                tokio::fs::rename(&tmp, &list_path).await?;
                self.write_formatted(articles).await?;
                Ok(StoreOutcome::Written { archived: None })
            }
        }
    }

    async fn prune_archives(&self, now: DateTime<Utc>) -> Result<Vec<PathBuf>> {
        let dir = self.path(ARCHIVE_DIR);
        let mut removed = Vec::new();

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(removed),
            Err(e) => return Err(AppError::Io(e)),
        };

        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let modified: DateTime<Utc> = metadata.modified()?.into();
            if now - modified > self.retention {
                tokio::fs::remove_file(entry.path()).await?;
                log::debug!("Pruned expired snapshot {}", entry.path().display());
                removed.push(entry.path());
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn make_article(id: &str, day: u32) -> Article {
        Article {
            id: id.to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 3, day, 5, 30, 0).unwrap(),
            title: format!("Article {id}"),
            title_segments: vec![],
            url: format!("https://mainichi.jp/maisho/articles/2024030{day}/{id}"),
            category: "ニュース".to_string(),
            preview: String::new(),
            preview_segments: vec![],
            image_uri: None,
            voice_uri: None,
            content: Some("本文".to_string()),
            content_segments: None,
        }
    }

    async fn archive_entries(root: &std::path::Path) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        let Ok(mut entries) = tokio::fs::read_dir(root.join(ARCHIVE_DIR)).await else {
            return paths;
        };
        while let Some(entry) = entries.next_entry().await.unwrap() {
            paths.push(entry.path());
        }
        paths
    }

    #[tokio::test]
    async fn test_first_store_writes_both_files() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), 24);

        let outcome = storage
            .store(&[make_article("a", 1)], Utc::now(), false)
            .await
            .unwrap();

        assert_eq!(outcome, StoreOutcome::Written { archived: None });
        assert!(tmp.path().join(LIST_FILE).exists());
        assert!(tmp.path().join(FORMATTED_FILE).exists());
        assert!(!tmp.path().join("news-list.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_identical_store_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), 24);
        let articles = vec![make_article("a", 1)];

        storage.store(&articles, Utc::now(), false).await.unwrap();
        let before = tokio::fs::read(tmp.path().join(LIST_FILE)).await.unwrap();
        let mtime_before = tokio::fs::metadata(tmp.path().join(LIST_FILE))
            .await
            .unwrap()
            .modified()
            .unwrap();

        let outcome = storage.store(&articles, Utc::now(), false).await.unwrap();
        assert_eq!(outcome, StoreOutcome::Unchanged);

        let after = tokio::fs::read(tmp.path().join(LIST_FILE)).await.unwrap();
        assert_eq!(before, after);
        let mtime_after = tokio::fs::metadata(tmp.path().join(LIST_FILE))
            .await
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(mtime_before, mtime_after);
        assert!(archive_entries(tmp.path()).await.is_empty());
        assert!(!tmp.path().join("news-list.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_changed_store_archives_previous_version() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), 24);

        let first = vec![make_article("a", 1)];
        storage.store(&first, Utc::now(), false).await.unwrap();

        let second = vec![make_article("a", 1), make_article("b", 2)];
        let outcome = storage.store(&second, Utc::now(), false).await.unwrap();

        let StoreOutcome::Written {
            archived: Some(archive),
        } = outcome
        else {
            panic!("expected an archived write");
        };

        // The archive holds the pre-update content.
        let archived_bytes = tokio::fs::read(&archive).await.unwrap();
        let archived: Vec<Article> = serde_json::from_slice(&archived_bytes).unwrap();
        assert_eq!(archived, first);

        let current: Vec<Article> = serde_json::from_slice(
            &tokio::fs::read(tmp.path().join(LIST_FILE)).await.unwrap(),
        )
        .unwrap();
        assert_eq!(current, second);
    }

    #[tokio::test]
    async fn test_force_store_skips_compare_and_archive() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), 24);

        storage
            .store(&[make_article("a", 1)], Utc::now(), false)
            .await
            .unwrap();

        let differing = vec![make_article("b", 2)];
        let outcome = storage.store(&differing, Utc::now(), true).await.unwrap();

        assert_eq!(outcome, StoreOutcome::Written { archived: None });
        assert!(archive_entries(tmp.path()).await.is_empty());

        let current: Vec<Article> = serde_json::from_slice(
            &tokio::fs::read(tmp.path().join(LIST_FILE)).await.unwrap(),
        )
        .unwrap();
        assert_eq!(current, differing);
    }

    #[tokio::test]
    async fn test_formatted_copy_matches_content() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), 24);
        let articles = vec![make_article("a", 1)];

        storage.store(&articles, Utc::now(), false).await.unwrap();

        let formatted: Vec<Article> = serde_json::from_slice(
            &tokio::fs::read(tmp.path().join(FORMATTED_FILE))
                .await
                .unwrap(),
        )
        .unwrap();
        assert_eq!(formatted, articles);
    }

    #[tokio::test]
    async fn test_load_empty_on_first_run() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), 24);
        assert!(storage.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), 24);
        let articles = vec![make_article("a", 1), make_article("b", 2)];

        storage.store(&articles, Utc::now(), false).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), articles);
    }

    #[tokio::test]
    async fn test_prune_respects_retention_window() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), 24);

        // Produce one archive file by storing twice with a change.
        storage
            .store(&[make_article("a", 1)], Utc::now(), false)
            .await
            .unwrap();
        storage
            .store(&[make_article("a", 1), make_article("b", 2)], Utc::now(), false)
            .await
            .unwrap();
        assert_eq!(archive_entries(tmp.path()).await.len(), 1);

        // Fresh file, within the window: kept.
        let removed = storage.prune_archives(Utc::now()).await.unwrap();
        assert!(removed.is_empty());
        assert_eq!(archive_entries(tmp.path()).await.len(), 1);

        // Still inside 24h when viewed from 23h later: kept.
        let removed = storage
            .prune_archives(Utc::now() + TimeDelta::hours(23))
            .await
            .unwrap();
        assert!(removed.is_empty());

        // Strictly older than 24h from this vantage point: removed.
        let removed = storage
            .prune_archives(Utc::now() + TimeDelta::hours(25))
            .await
            .unwrap();
        assert_eq!(removed.len(), 1);
        assert!(archive_entries(tmp.path()).await.is_empty());
    }

    #[tokio::test]
    async fn test_prune_without_archive_dir() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), 24);
        assert!(storage.prune_archives(Utc::now()).await.unwrap().is_empty());
    }
}
