//! Persistence for the merged article list.
//!
//! The store owns the snapshot protocol: the primary file is only
//! replaced when content actually changed, the previous version is
//! archived first, and archives are pruned once they age out of the
//! retention window.

mod local;

pub use local::LocalStorage;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Article;

/// Result of a store attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The list was written; when a differing prior version existed, it
    /// was archived at the given path first.
    Written { archived: Option<PathBuf> },

    /// The persisted content was byte-identical; nothing was touched.
    Unchanged,
}

/// Storage backend for the persisted article list.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Load the currently persisted list, empty on first run.
    async fn load(&self) -> Result<Vec<Article>>;

    /// Persist the merged list, archiving the prior version on change.
    ///
    /// `now` names the archive snapshot; `force` takes the first-run
    /// direct-overwrite path even when a current file exists.
    async fn store(
        &self,
        articles: &[Article],
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<StoreOutcome>;

    /// Delete archived snapshots older than the retention window,
    /// returning the removed paths.
    async fn prune_archives(&self, now: DateTime<Utc>) -> Result<Vec<PathBuf>>;
}
