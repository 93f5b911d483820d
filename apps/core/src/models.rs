use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::absa::{AggregatedVerdicts, Aspect, Classification, Observation, Sentiment};

/// Upper bound on accepted text size, in characters. Mirrors the validator attributes below.
pub const MAX_TEXT_LEN: u64 = 20_000;

/// Number of decimals kept in boundary confidences.
pub const CONFIDENCE_DECIMALS: i32 = 3;

/// Round a confidence for output. Only applied after aggregation.
pub fn round_confidence(confidence: f32) -> f32 {
    let factor = 10f64.powi(CONFIDENCE_DECIMALS);
    ((confidence as f64 * factor).round() / factor) as f32
}

/// Request to classify one piece of text directly.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SentenceRequest {
    #[validate(length(max = 20000))]
    pub sentence: String,
}

/// Request to run aspect analysis over one review.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewRequest {
    #[validate(length(max = 20000))]
    pub review: String,
}

/// One line of a batch input file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BatchReview {
    /// Caller-supplied identifier; generated when absent.
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub id: Option<String>,
    #[validate(length(max = 20000))]
    pub review: String,
    /// Star rating, when the source has one.
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f32>,
}

/// Output of the single-sentence classifier endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceSentiment {
    pub sentence: String,
    pub sentiment: Sentiment,
    pub confidence: f32,
}

impl SentenceSentiment {
    pub fn new(sentence: impl Into<String>, classification: &Classification) -> Self {
        Self {
            sentence: sentence.into(),
            sentiment: classification.label,
            confidence: round_confidence(classification.confidence),
        }
    }
}

/// Boundary form of an aggregated verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectVerdict {
    pub sentiment: Sentiment,
    pub confidence: f32,
    /// The clause that produced the verdict.
    pub sentence: String,
}

impl From<&Observation> for AspectVerdict {
    fn from(observation: &Observation) -> Self {
        Self {
            sentiment: observation.sentiment,
            confidence: round_confidence(observation.confidence),
            sentence: observation.clause.clone(),
        }
    }
}

/// Aspect → verdict map as returned to callers.
pub type AspectVerdicts = IndexMap<Aspect, AspectVerdict>;

/// Convert aggregated verdicts to their rounded boundary form.
pub fn to_boundary(verdicts: &AggregatedVerdicts) -> AspectVerdicts {
    verdicts
        .iter()
        .map(|(aspect, observation)| (aspect.clone(), AspectVerdict::from(observation)))
        .collect()
}

/// Flattened per-aspect result row, the unit of batch output and insights input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRecord {
    pub review_id: String,
    #[serde(default)]
    pub rating: Option<f32>,
    pub aspect: Aspect,
    pub sentiment: Sentiment,
    pub confidence: f32,
    pub sentence: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.91234), 0.912);
        assert_eq!(round_confidence(0.99951), 1.0);
        assert_eq!(round_confidence(0.0), 0.0);
    }

    #[test]
    fn test_review_request_validation() {
        let ok = ReviewRequest {
            review: "Great camera".to_string(),
        };
        assert!(ok.validate().is_ok());

        let too_long = ReviewRequest {
            review: "a".repeat(MAX_TEXT_LEN as usize + 1),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_batch_review_defaults_and_ranges() {
        let parsed: BatchReview = serde_json::from_str(r#"{"review": "ok"}"#).unwrap();
        assert!(parsed.id.is_none());
        assert!(parsed.rating.is_none());
        assert!(parsed.validate().is_ok());

        let bad: BatchReview =
            serde_json::from_str(r#"{"id": "r1", "review": "ok", "rating": 7}"#).unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_aspect_verdict_rounds() {
        let observation = Observation::new("battery", Sentiment::Negative, 0.93456, "terrible battery");
        let verdict = AspectVerdict::from(&observation);
        assert_eq!(verdict.confidence, 0.935);
        assert_eq!(verdict.sentence, "terrible battery");

        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["sentiment"], "negative");
    }
}
