//! Article data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::iso_millis;

/// A run of text with an optional phonetic reading.
///
/// `reading` is set only when `text` is the base of a bracketed furigana
/// annotation in the source; plain runs carry no reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextSegment {
    /// Base text as it appears in the article
    pub text: String,

    /// Phonetic reading, if the segment was annotated
    pub reading: Option<String>,
}

/// One discovered news article.
///
/// Created when first observed on the index page, enriched once with body
/// content, and never mutated after being merged into the persisted list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Stable identifier, derived from the URL's last path segment
    pub id: String,

    /// Publication instant, normalized to UTC from the site's JST time
    #[serde(with = "iso_millis")]
    pub published_at: DateTime<Utc>,

    /// Title with reading annotations stripped
    pub title: String,

    /// Title split into (text, reading) segments
    pub title_segments: Vec<TextSegment>,

    /// Canonical absolute URL of the article page
    pub url: String,

    /// Category label from the index page
    pub category: String,

    /// Preview text, whitespace-normalized and annotation-free
    pub preview: String,

    /// Preview split into (text, reading) segments
    pub preview_segments: Vec<TextSegment>,

    /// Article image, filled by downstream media processing
    #[serde(default)]
    pub image_uri: Option<String>,

    /// Narrated audio, filled by downstream media processing
    #[serde(default)]
    pub voice_uri: Option<String>,

    /// Body text with reading annotations stripped; set during enrichment
    #[serde(default)]
    pub content: Option<String>,

    /// Body split into (text, reading) segments; set during enrichment
    #[serde(default)]
    pub content_segments: Option<Vec<TextSegment>>,
}
