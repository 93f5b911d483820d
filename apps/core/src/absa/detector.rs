//! Dictionary-based aspect detection.
//!
//! A clause mentions an aspect when any of that aspect's trigger phrases
//! occurs in the lower-cased clause. Multi-word phrases are matched as
//! contiguous text, never as independent words.

use regex::Regex;
use tracing::debug;

use super::aspect::{Aspect, AspectDictionary, MatchMode};
use crate::error::AppError;

enum PhraseMatcher {
    Substring(String),
    Word(Regex),
}

impl PhraseMatcher {
    fn is_match(&self, lowered: &str) -> bool {
        match self {
            PhraseMatcher::Substring(phrase) => lowered.contains(phrase.as_str()),
            PhraseMatcher::Word(pattern) => pattern.is_match(lowered),
        }
    }
}

struct AspectRule {
    aspect: Aspect,
    matchers: Vec<PhraseMatcher>,
}

/// Detects which configured aspects a clause talks about
pub struct AspectDetector {
    dictionary: AspectDictionary,
    mode: MatchMode,
    rules: Vec<AspectRule>,
}

impl Default for AspectDetector {
    fn default() -> Self {
        Self::substring(AspectDictionary::default())
    }
}

impl AspectDetector {
    /// Create a detector over `dictionary` using the given match mode
    pub fn new(dictionary: AspectDictionary, mode: MatchMode) -> Result<Self, AppError> {
        let mut rules = Vec::with_capacity(dictionary.len());

        for (aspect, phrases) in dictionary.iter() {
            let matchers = phrases
                .iter()
                .map(|phrase| -> Result<PhraseMatcher, AppError> {
                    match mode {
                        MatchMode::Substring => Ok(PhraseMatcher::Substring(phrase.clone())),
                        MatchMode::Word => {
                            let pattern = format!(r"\b{}\b", regex::escape(phrase));
                            Ok(PhraseMatcher::Word(Regex::new(&pattern)?))
                        }
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            rules.push(AspectRule {
                aspect: aspect.clone(),
                matchers,
            });
        }

        Ok(Self {
            dictionary,
            mode,
            rules,
        })
    }

    /// Plain substring detector; cannot fail
    pub fn substring(dictionary: AspectDictionary) -> Self {
        let rules = dictionary
            .iter()
            .map(|(aspect, phrases)| AspectRule {
                aspect: aspect.clone(),
                matchers: phrases
                    .iter()
                    .cloned()
                    .map(PhraseMatcher::Substring)
                    .collect(),
            })
            .collect();

        Self {
            dictionary,
            mode: MatchMode::Substring,
            rules,
        }
    }

    /// Aspects mentioned in `clause`, in dictionary order, without duplicates
    pub fn detect(&self, clause: &str) -> Vec<Aspect> {
        let lowered = clause.to_lowercase();

        let aspects: Vec<Aspect> = self
            .rules
            .iter()
            .filter(|rule| rule.matchers.iter().any(|m| m.is_match(&lowered)))
            .map(|rule| rule.aspect.clone())
            .collect();

        debug!(clause, ?aspects, "aspect detection");
        aspects
    }

    pub fn dictionary(&self) -> &AspectDictionary {
        &self.dictionary
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}
