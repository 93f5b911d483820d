//! Sentiment classifier capability.
//!
//! The pipeline never owns a model directly; it receives something that
//! implements [`SentimentClassifier`]. Backends that need loading must fail
//! in their constructor with [`AppError::ModelUnavailable`], never lazily
//! on the first request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::AppError;

/// Sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Sentiment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(AppError::Validation(format!("Unknown sentiment '{}'", other))),
        }
    }
}

/// Probability assigned to one label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub sentiment: Sentiment,
    pub probability: f32,
}

/// Output of a single classification call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Most probable label
    pub label: Sentiment,
    /// Maximum value of the distribution (0.0 - 1.0)
    pub confidence: f32,
    /// Full probability distribution over labels
    pub distribution: Vec<LabelScore>,
}

impl Classification {
    /// Pick the arg-max of a probability distribution. Earlier entries win ties.
    pub fn from_distribution(distribution: Vec<LabelScore>) -> Result<Self, AppError> {
        let mut best: Option<LabelScore> = None;
        for score in &distribution {
            if !score.probability.is_finite() || !(0.0..=1.0).contains(&score.probability) {
                return Err(AppError::Classification(format!(
                    "Probability for {} out of range: {}",
                    score.sentiment, score.probability
                )));
            }
            if best.map_or(true, |b| score.probability > b.probability) {
                best = Some(*score);
            }
        }

        let best = best.ok_or_else(|| {
            AppError::Classification("Classifier returned an empty distribution".to_string())
        })?;

        Ok(Self {
            label: best.sentiment,
            confidence: best.probability,
            distribution,
        })
    }

    /// A classification with `confidence` on `label` and the remainder split evenly
    pub fn new(label: Sentiment, confidence: f32) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        let rest = (1.0 - confidence) / (Sentiment::ALL.len() - 1) as f32;
        let distribution = Sentiment::ALL
            .iter()
            .map(|&sentiment| LabelScore {
                sentiment,
                probability: if sentiment == label { confidence } else { rest },
            })
            .collect();

        Self {
            label,
            confidence,
            distribution,
        }
    }
}

/// Anything that can assign a sentiment to a piece of text.
///
/// Implementations must be deterministic for a fixed model state and safe to
/// share between threads.
pub trait SentimentClassifier: Send + Sync {
    /// Classify `text`, returning the winning label and its probability
    fn classify(&self, text: &str) -> Result<Classification, AppError>;

    /// Short backend name for logs and reports
    fn name(&self) -> &'static str;
}

impl<C: SentimentClassifier + ?Sized> SentimentClassifier for Box<C> {
    fn classify(&self, text: &str) -> Result<Classification, AppError> {
        (**self).classify(text)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<C: SentimentClassifier + ?Sized> SentimentClassifier for Arc<C> {
    fn classify(&self, text: &str) -> Result<Classification, AppError> {
        (**self).classify(text)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Numerically stable softmax; `temperature` below 1.0 sharpens the result
pub fn softmax(scores: &[f32], temperature: f32) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let temperature = if temperature > 0.0 { temperature } else { 1.0 };
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores
        .iter()
        .map(|s| ((s - max) / temperature).exp())
        .collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
