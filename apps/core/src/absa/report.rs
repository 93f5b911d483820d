//! Review Report - Output structure for a full review analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pipeline::AnalysisStats;
use crate::models::AspectVerdicts;

/// Boundary result of one review plus counters and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewReport {
    /// Original review text
    pub review: String,

    /// Name of the classifier backend that produced the verdicts
    pub classifier: String,

    /// Aspect → rounded verdict
    pub aspects: AspectVerdicts,

    /// Segmentation and classification counters
    pub stats: AnalysisStats,

    /// Observations produced before aggregation
    pub observation_count: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,

    /// Timestamp of analysis
    pub timestamp: DateTime<Utc>,
}

impl ReviewReport {
    /// Create an empty report
    pub fn new(review: String, classifier: &str) -> Self {
        Self {
            review,
            classifier: classifier.to_string(),
            aspects: AspectVerdicts::new(),
            stats: AnalysisStats::default(),
            observation_count: 0,
            processing_time_ms: 0,
            timestamp: Utc::now(),
        }
    }

    /// Whether any aspect was found
    pub fn has_verdicts(&self) -> bool {
        !self.aspects.is_empty()
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        let aspects: Vec<String> = self
            .aspects
            .iter()
            .map(|(aspect, verdict)| format!("{}={}", aspect, verdict.sentiment))
            .collect();

        format!(
            "Aspects: [{}], Clauses: {}/{} classified, Classifier: {}, Time: {}ms",
            aspects.join(", "),
            self.stats.classified_clauses,
            self.stats.clauses,
            self.classifier,
            self.processing_time_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absa::{Aspect, Sentiment};
    use crate::models::AspectVerdict;

    #[test]
    fn test_report_creation() {
        let report = ReviewReport::new("test review".to_string(), "lexicon");

        assert_eq!(report.review, "test review");
        assert_eq!(report.classifier, "lexicon");
        assert!(!report.has_verdicts());
        assert_eq!(report.observation_count, 0);
    }

    #[test]
    fn test_summary() {
        let mut report = ReviewReport::new("battery bad".to_string(), "lexicon");
        report.aspects.insert(
            Aspect::new("battery"),
            AspectVerdict {
                sentiment: Sentiment::Negative,
                confidence: 0.9,
                sentence: "battery bad".to_string(),
            },
        );

        let summary = report.summary();
        assert!(summary.contains("battery=negative"));
        assert!(summary.contains("Classifier: lexicon"));
    }

    #[test]
    fn test_serializes_aspect_map() {
        let mut report = ReviewReport::new("x".to_string(), "lexicon");
        report.aspects.insert(
            Aspect::new("camera"),
            AspectVerdict {
                sentiment: Sentiment::Positive,
                confidence: 0.8,
                sentence: "Great camera".to_string(),
            },
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["aspects"]["camera"]["sentiment"], "positive");
        assert_eq!(json["aspects"]["camera"]["sentence"], "Great camera");
    }
}
