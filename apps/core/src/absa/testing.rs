//! Deterministic classifier doubles.
//!
//! Lets pipeline logic be exercised without loading any model.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::classifier::{Classification, Sentiment, SentimentClassifier};
use crate::error::AppError;

/// Classifier that answers from a fixed script keyed by exact text.
///
/// Unknown text falls back to the default answer (neutral, 0.5 unless
/// overridden). Every call is recorded for assertions.
pub struct ScriptedClassifier {
    responses: HashMap<String, Classification>,
    failures: Vec<String>,
    fallback: Classification,
    calls: Arc<RwLock<Vec<String>>>,
}

impl Default for ScriptedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            failures: Vec::new(),
            fallback: Classification::new(Sentiment::Neutral, 0.5),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Answer `label` with `confidence` when asked about exactly `text`
    pub fn with_response(mut self, text: impl Into<String>, label: Sentiment, confidence: f32) -> Self {
        self.responses
            .insert(text.into(), Classification::new(label, confidence));
        self
    }

    /// Answer for any text without a scripted response
    pub fn with_fallback(mut self, label: Sentiment, confidence: f32) -> Self {
        self.fallback = Classification::new(label, confidence);
        self
    }

    /// Fail with a classification error when asked about exactly `text`
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failures.push(text.into());
        self
    }

    /// Texts classified so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().map(|c| c.len()).unwrap_or(0)
    }
}

impl SentimentClassifier for ScriptedClassifier {
    fn classify(&self, text: &str) -> Result<Classification, AppError> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(text.to_string());
        }

        if self.failures.iter().any(|f| f == text) {
            return Err(AppError::Classification(format!(
                "scripted failure for '{}'",
                text
            )));
        }

        Ok(self
            .responses
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
