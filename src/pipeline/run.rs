//! Full crawl run orchestration.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::enrich::ContentFetcher;
use crate::pipeline::{index, merge};
use crate::storage::{ArticleStore, StoreOutcome};
use crate::utils::http;

/// Summary of one crawl run.
#[derive(Debug, Default)]
pub struct RunStats {
    /// Candidates parsed from the index page
    pub fetched: usize,
    /// Candidates selected for enrichment
    pub selected: usize,
    /// Articles successfully enriched with body content
    pub enriched: usize,
    /// Size of the merged persisted list
    pub total: usize,
    /// Whether the persisted list changed on disk
    pub changed: bool,
    /// Archive path written before the overwrite, if any
    pub archived: Option<PathBuf>,
    /// Expired snapshots removed after the write
    pub pruned: usize,
}

/// Run one complete fetch-merge-persist cycle.
///
/// Reads the persisted list once at start and writes it at most once at
/// the end. Only per-article enrichment errors are tolerated; anything
/// else propagates to the caller.
pub async fn run(config: &Config, storage: &dyn ArticleStore, force: bool) -> Result<RunStats> {
    let now = Utc::now();
    let mut stats = RunStats::default();

    let existing = storage.load().await?;
    log::info!("Loaded {} persisted articles", existing.len());

    let client = http::create_client(&config.crawler)?;
    let candidates = index::fetch_index(&client, &config.site).await?;
    stats.fetched = candidates.len();
    log::info!("Index page yielded {} candidates", stats.fetched);

    let working = merge::select_new(&existing, candidates, force);
    stats.selected = working.len();
    log::info!("{} articles selected for enrichment", stats.selected);

    let fetcher = ContentFetcher::new(
        client,
        &config.site,
        Duration::from_millis(config.crawler.request_delay_ms),
    );
    let enriched = fetcher.enrich_all(working).await;
    stats.enriched = enriched.len();

    let merged = merge::merge(existing, enriched);
    stats.total = merged.len();

    match storage.store(&merged, now, force).await? {
        StoreOutcome::Written { archived } => {
            stats.changed = true;
            stats.archived = archived;
        }
        StoreOutcome::Unchanged => {
            stats.changed = false;
        }
    }

    stats.pruned = storage.prune_archives(now).await?.len();

    Ok(stats)
}
