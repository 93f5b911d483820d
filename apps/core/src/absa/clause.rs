//! Clause segmentation on contrastive connectives.
//!
//! A sentence like "battery is great but camera is bad" carries two opinions;
//! splitting on the connective keeps "great" away from the camera judgment.

use regex::Regex;
use std::sync::LazyLock;

/// Discourse connectives that signal a shift in sentiment
pub const CONNECTIVES: &[&str] = &["but", "however", "although", "though"];

// NOTE: expect() is acceptable here, the pattern is a compile-time constant
static CONNECTIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:but|however|although|though)\b")
        .expect("Invalid regex: connective pattern")
});

/// Splits a sentence into clauses on whole-word connectives
#[derive(Debug, Clone, Copy, Default)]
pub struct ClauseSegmenter;

impl ClauseSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Trimmed, non-empty clauses in source order
    pub fn segment<'a>(&self, sentence: &'a str) -> Vec<&'a str> {
        CONNECTIVE_PATTERN
            .split(sentence)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }
}
