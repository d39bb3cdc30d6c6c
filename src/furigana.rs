// src/furigana.rs

//! Inline furigana extraction.
//!
//! Maisho articles annotate kanji with readings using full-width
//! parentheses directly in the body text, e.g. `新聞（しんぶん）`.
//! This module splits such text into segments that keep the reading
//! attached to its base text, so downstream consumers can render ruby
//! text without re-parsing.

use crate::models::TextSegment;

/// Full-width opening parenthesis marking the start of a reading.
pub const READING_OPEN: char = '（';

/// Full-width closing parenthesis marking the end of a reading.
pub const READING_CLOSE: char = '）';

/// Split annotated text into ordered segments.
///
/// A single left-to-right scan. Text accumulates into a pending buffer;
/// when a `（` is hit, the buffer becomes the base of a segment whose
/// reading is everything up to the matching `）` (or end of input when
/// the bracket is never closed). Trailing plain text flushes as a
/// segment with no reading.
///
/// An annotation with nothing buffered before it produces no segment:
/// the reading has no base to attach to and is dropped. This mirrors
/// the source data, where a stray reading is meaningless.
///
/// Concatenating the `text` of every segment reproduces the input with
/// the brackets and reading content removed.
pub fn extract_segments(input: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != READING_OPEN {
            buffer.push(c);
            continue;
        }

        let mut reading = String::new();
        for r in chars.by_ref() {
            if r == READING_CLOSE {
                break;
            }
            reading.push(r);
        }

        if buffer.is_empty() {
            continue;
        }

        segments.push(TextSegment {
            text: std::mem::take(&mut buffer),
            reading: Some(reading),
        });
    }

    if !buffer.is_empty() {
        segments.push(TextSegment {
            text: buffer,
            reading: None,
        });
    }

    segments
}

/// Concatenate segment text, i.e. the input with annotations stripped.
pub fn plain_text(segments: &[TextSegment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}
