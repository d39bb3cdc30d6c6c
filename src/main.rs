//! Maisho Crawler CLI
//!
//! Fetches the Mainichi elementary-school newspaper index, enriches new
//! articles with body content, and maintains the persisted article list
//! with timestamped snapshots.

use std::path::PathBuf;

use clap::Parser;
use maisho_crawler::{error::Result, models::Config, pipeline, storage::LocalStorage};

/// Maisho news crawler
#[derive(Parser, Debug)]
#[command(
    name = "maisho-crawler",
    version,
    about = "Mainichi elementary-school newspaper crawler"
)]
struct Cli {
    /// Path to storage directory containing config and output files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Reprocess every fetched article and rewrite the list unconditionally
    #[arg(long)]
    force: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Maisho crawler starting...");

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    config.validate()?;

    if cli.force {
        log::info!("Force refresh: reprocessing every candidate");
    }

    let storage = LocalStorage::new(&cli.storage_dir, config.storage.archive_retention_hours);
    let stats = pipeline::run(&config, &storage, cli.force).await?;

    log::info!(
        "Run complete: {} candidates, {} selected, {} enriched, {} persisted",
        stats.fetched,
        stats.selected,
        stats.enriched,
        stats.total
    );

    if stats.changed {
        match &stats.archived {
            Some(path) => log::info!("List updated; previous version at {}", path.display()),
            None => log::info!("List written"),
        }
    } else {
        log::info!("No changes");
    }

    if stats.pruned > 0 {
        log::info!("Pruned {} expired snapshots", stats.pruned);
    }

    Ok(())
}
