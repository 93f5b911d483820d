//! Analysis pipeline - orchestrates segmentation, detection, classification
//! and aggregation for one review.
//!
//! review → sentences → clauses → aspects → (one classification per clause)
//! → observations → per-aspect verdicts

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use super::aggregator::{aggregate, AggregatedVerdicts, Observation};
use super::clause::ClauseSegmenter;
use super::classifier::{Classification, SentimentClassifier};
use super::detector::AspectDetector;
use super::report::ReviewReport;
use super::sentence::SentenceSegmenter;
use crate::error::AppError;
use crate::models::{to_boundary, AspectVerdicts, SentenceSentiment};

/// Counters collected while analyzing one review
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub sentences: usize,
    pub clauses: usize,
    /// Clauses that mentioned at least one aspect and were classified
    pub classified_clauses: usize,
    /// Clauses with no aspect, never sent to the classifier
    pub skipped_clauses: usize,
}

/// Full, unrounded result of analyzing one review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAnalysis {
    pub verdicts: AggregatedVerdicts,
    pub observations: Vec<Observation>,
    pub stats: AnalysisStats,
}

/// Review analysis pipeline over an injected classifier
pub struct AnalysisPipeline<C> {
    sentences: SentenceSegmenter,
    clauses: ClauseSegmenter,
    detector: AspectDetector,
    classifier: C,
}

impl<C: SentimentClassifier> AnalysisPipeline<C> {
    /// Create a pipeline from a configured detector and a loaded classifier
    pub fn new(detector: AspectDetector, classifier: C) -> Self {
        info!(
            classifier = classifier.name(),
            aspects = detector.dictionary().len(),
            "Analysis pipeline ready"
        );
        Self {
            sentences: SentenceSegmenter::new(),
            clauses: ClauseSegmenter::new(),
            detector,
            classifier,
        }
    }

    pub fn detector(&self) -> &AspectDetector {
        &self.detector
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Classify text directly, without splitting or aspect detection
    pub fn classify(&self, text: &str) -> Result<Classification, AppError> {
        self.classifier.classify(text)
    }

    /// Single-sentence endpoint: label and rounded confidence
    pub fn classify_sentence(&self, sentence: &str) -> Result<SentenceSentiment, AppError> {
        let classification = self.classify(sentence)?;
        Ok(SentenceSentiment::new(sentence, &classification))
    }

    /// Run the full pipeline over one review.
    ///
    /// Each clause that mentions at least one aspect is classified exactly
    /// once; the result is shared by every aspect the clause matched. A
    /// classification failure aborts the whole review.
    pub fn analyze(&self, review: &str) -> Result<ReviewAnalysis, AppError> {
        let mut stats = AnalysisStats::default();
        let mut observations = Vec::new();

        for sentence in self.sentences.segment(review) {
            stats.sentences += 1;

            for clause in self.clauses.segment(sentence) {
                stats.clauses += 1;

                let aspects = self.detector.detect(clause);
                if aspects.is_empty() {
                    stats.skipped_clauses += 1;
                    continue;
                }

                let classification = self.classifier.classify(clause)?;
                stats.classified_clauses += 1;
                debug!(
                    clause,
                    label = %classification.label,
                    confidence = classification.confidence,
                    "clause classified"
                );

                observations.extend(aspects.into_iter().map(|aspect| Observation {
                    aspect,
                    sentiment: classification.label,
                    confidence: classification.confidence,
                    clause: clause.to_string(),
                }));
            }
        }

        let verdicts = aggregate(observations.iter().cloned());

        Ok(ReviewAnalysis {
            verdicts,
            observations,
            stats,
        })
    }

    /// Review endpoint: aspect → rounded verdict
    pub fn analyze_review(&self, review: &str) -> Result<AspectVerdicts, AppError> {
        let analysis = self.analyze(review)?;
        Ok(to_boundary(&analysis.verdicts))
    }

    /// Analyze and wrap the boundary result with counters and timing
    pub fn report(&self, review: &str) -> Result<ReviewReport, AppError> {
        let start = Instant::now();
        let analysis = self.analyze(review)?;

        let mut report = ReviewReport::new(review.to_string(), self.classifier.name());
        report.aspects = to_boundary(&analysis.verdicts);
        report.stats = analysis.stats;
        report.observation_count = analysis.observations.len();
        report.processing_time_ms = start.elapsed().as_millis() as u64;
        report.timestamp = Utc::now();

        Ok(report)
    }
}
