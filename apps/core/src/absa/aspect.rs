//! Aspect labels and the aspect → trigger phrase dictionary.
//!
//! The dictionary is plain configuration: the built-in default covers six
//! product aspects, and a JSON object of the same shape can replace it
//! without touching the pipeline.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::AppError;

/// Product aspect label (e.g. `battery`, `camera`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Aspect(String);

impl Aspect {
    /// Labels are stored trimmed and lower-cased
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Aspect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl From<&str> for Aspect {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// How trigger phrases are matched against a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Phrase occurs anywhere in the lower-cased clause
    #[default]
    Substring,
    /// Phrase must start and end on word boundaries
    Word,
}

impl FromStr for MatchMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "word" => Ok(MatchMode::Word),
            other => Err(AppError::Config(format!(
                "Unknown match mode '{}' (expected 'substring' or 'word')",
                other
            ))),
        }
    }
}

/// Built-in aspects and their trigger phrases
const DEFAULT_ASPECTS: &[(&str, &[&str])] = &[
    ("battery", &["battery", "battery life", "charge", "charging"]),
    ("camera", &["camera", "photo", "picture", "video"]),
    ("display", &["screen", "display", "resolution"]),
    ("performance", &["performance", "speed", "lag", "slow", "fast"]),
    ("build", &["build quality", "design", "material"]),
    ("price", &["price", "cost", "value", "worth"]),
];

/// Ordered mapping from aspect to its trigger phrases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AspectDictionary {
    entries: IndexMap<Aspect, Vec<String>>,
}

impl Default for AspectDictionary {
    fn default() -> Self {
        Self::from_pairs(
            DEFAULT_ASPECTS
                .iter()
                .map(|(aspect, phrases)| (*aspect, phrases.iter().copied())),
        )
    }
}

impl AspectDictionary {
    /// Build a dictionary from (aspect, phrases) pairs, normalizing case and whitespace
    pub fn from_pairs<A, I, P>(pairs: impl IntoIterator<Item = (A, I)>) -> Self
    where
        A: AsRef<str>,
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut entries: IndexMap<Aspect, Vec<String>> = IndexMap::new();
        for (aspect, phrases) in pairs {
            let bucket = entries.entry(Aspect::new(aspect)).or_default();
            for phrase in phrases {
                let phrase = phrase.as_ref().trim().to_lowercase();
                if !phrase.is_empty() && !bucket.contains(&phrase) {
                    bucket.push(phrase);
                }
            }
        }
        Self { entries }
    }

    /// Parse a JSON object of the form `{"aspect": ["phrase", ...]}`
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let raw: IndexMap<String, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Invalid aspect dictionary: {}", e)))?;
        let dictionary = Self::from_pairs(raw);
        dictionary.validate()?;
        Ok(dictionary)
    }

    /// Load a dictionary file
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read aspect dictionary {:?}: {}", path, e))
        })?;
        let dictionary = Self::from_json(&content)?;
        info!("Loaded {} aspects from {:?}", dictionary.len(), path);
        Ok(dictionary)
    }

    /// Reject dictionaries that could never match anything
    pub fn validate(&self) -> Result<(), AppError> {
        if self.entries.is_empty() {
            return Err(AppError::Config("Aspect dictionary is empty".to_string()));
        }
        if let Some((aspect, _)) = self.entries.iter().find(|(_, p)| p.is_empty()) {
            return Err(AppError::Config(format!(
                "Aspect '{}' has no trigger phrases",
                aspect
            )));
        }
        if self.entries.keys().any(|a| a.as_str().is_empty()) {
            return Err(AppError::Config("Aspect label cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Aspect, &[String])> {
        self.entries.iter().map(|(a, p)| (a, p.as_slice()))
    }

    pub fn aspects(&self) -> impl Iterator<Item = &Aspect> {
        self.entries.keys()
    }

    pub fn phrases(&self, aspect: &Aspect) -> Option<&[String]> {
        self.entries.get(aspect).map(Vec::as_slice)
    }

    pub fn contains(&self, aspect: &Aspect) -> bool {
        self.entries.contains_key(aspect)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
