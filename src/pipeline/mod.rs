//! Pipeline stages for a crawl run.
//!
//! - `index`: fetch and parse the news index page into candidate articles
//! - `merge`: select unseen candidates and merge enriched ones into the list
//! - `enrich`: fetch article bodies under the configured request delay
//! - `run`: orchestrate one full run

pub mod enrich;
pub mod index;
pub mod merge;
pub mod run;

pub use run::{RunStats, run};
