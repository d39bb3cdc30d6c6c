//! Deduplication and merge of fetched articles against the persisted list.
//!
//! The persisted list only ever grows: articles already known keep their
//! stored version, newly enriched ones are appended, and the result is
//! kept sorted by publication time, newest first.

use std::collections::HashSet;

use crate::models::Article;

/// Select the working set of candidates to enrich.
///
/// By default only candidates whose id is not in the existing list are
/// kept; force mode returns every candidate for reprocessing.
pub fn select_new(existing: &[Article], candidates: Vec<Article>, force: bool) -> Vec<Article> {
    if force {
        return candidates;
    }

    let known: HashSet<&str> = existing.iter().map(|a| a.id.as_str()).collect();
    candidates
        .into_iter()
        .filter(|c| !known.contains(c.id.as_str()))
        .collect()
}

/// Merge enriched articles into the existing list.
///
/// Existing articles come first, so on an id collision the stored version
/// wins. The result holds each id exactly once and is sorted by
/// `published_at` descending. Merging a list with itself is a no-op.
pub fn merge(existing: Vec<Article>, enriched: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Article> = existing
        .into_iter()
        .chain(enriched)
        .filter(|a| seen.insert(a.id.clone()))
        .collect();

    // Stable sort keeps first-seen order for articles sharing a timestamp.
    merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    merged
}
