//! Sentence segmentation.
//!
//! Splits review text on `.`, `!` and `?`. Terminators are dropped, fragments
//! are trimmed and empty fragments discarded. Abbreviations and decimal
//! numbers are not special-cased.

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Splits raw review text into sentence spans
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceSegmenter;

impl SentenceSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Lazily yield trimmed, non-empty sentences in source order
    pub fn segment<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.split(TERMINATORS)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
