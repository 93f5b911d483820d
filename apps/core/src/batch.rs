//! Batch analysis over JSON Lines input.
//!
//! Reviews run on the blocking pool with bounded concurrency; results come
//! back in input order. A failed review is reported, not fatal.

use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::absa::{AnalysisPipeline, SentimentClassifier};
use crate::error::AppError;
use crate::models::{AspectRecord, AspectVerdicts, BatchReview};

/// Outcome of one review in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    pub aspects: AspectVerdicts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Flatten into one record per aspect verdict
    pub fn records(&self) -> impl Iterator<Item = AspectRecord> + '_ {
        self.aspects.iter().map(|(aspect, verdict)| AspectRecord {
            review_id: self.id.clone(),
            rating: self.rating,
            aspect: aspect.clone(),
            sentiment: verdict.sentiment,
            confidence: verdict.confidence,
            sentence: verdict.sentence.clone(),
        })
    }
}

/// Totals for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub records: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[BatchResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            records: results.iter().map(|r| r.aspects.len()).sum(),
        }
    }
}

/// Analyze every review with at most `concurrency` in flight.
pub async fn analyze_batch<C>(
    pipeline: Arc<AnalysisPipeline<C>>,
    reviews: Vec<BatchReview>,
    concurrency: usize,
) -> Vec<BatchResult>
where
    C: SentimentClassifier + 'static,
{
    let concurrency = concurrency.max(1);
    let start = Instant::now();

    info!(
        reviews = reviews.len(),
        concurrency, "Starting batch analysis"
    );

    let results: Vec<BatchResult> = stream::iter(reviews.into_iter().map(|review| {
        let pipeline = Arc::clone(&pipeline);
        async move {
            let id = review
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let text = review.review;

            let outcome = tokio::task::spawn_blocking(move || pipeline.analyze_review(&text))
                .await
                .map_err(AppError::from)
                .and_then(|result| result);

            match outcome {
                Ok(aspects) => {
                    debug!(id = id.as_str(), aspects = aspects.len(), "review analyzed");
                    BatchResult {
                        id,
                        rating: review.rating,
                        aspects,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(id = id.as_str(), "Review analysis failed: {}", e);
                    BatchResult {
                        id,
                        rating: review.rating,
                        aspects: AspectVerdicts::new(),
                        error: Some(e.to_string()),
                    }
                }
            }
        }
    }))
    .buffered(concurrency)
    .collect()
    .await;

    let summary = BatchSummary::from_results(&results);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        records = summary.records,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch analysis complete"
    );

    results
}

/// Read batch input, skipping blank, malformed and invalid lines.
pub fn read_reviews<R: BufRead>(reader: R) -> Result<Vec<BatchReview>, AppError> {
    read_jsonl(reader, |review: &BatchReview| {
        review.validate().map_err(AppError::from)
    })
}

/// Read aspect records previously written by a batch run.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<AspectRecord>, AppError> {
    read_jsonl(reader, |_: &AspectRecord| Ok(()))
}

fn read_jsonl<R, T, F>(reader: R, check: F) -> Result<Vec<T>, AppError>
where
    R: BufRead,
    T: DeserializeOwned,
    F: Fn(&T) -> Result<(), AppError>,
{
    let mut items = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let item = match serde_json::from_str::<T>(&line) {
            Ok(item) => item,
            Err(e) => {
                warn!(line = line_no, "Skipping malformed line: {}", e);
                skipped += 1;
                continue;
            }
        };

        if let Err(e) = check(&item) {
            warn!(line = line_no, "Skipping invalid line: {}", e);
            skipped += 1;
            continue;
        }

        items.push(item);
    }

    if skipped > 0 {
        warn!(skipped, kept = items.len(), "Some input lines were skipped");
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absa::testing::ScriptedClassifier;
    use crate::absa::{Aspect, AspectDetector, Sentiment};
    use std::io::Cursor;

    fn review(id: Option<&str>, text: &str, rating: Option<f32>) -> BatchReview {
        BatchReview {
            id: id.map(str::to_string),
            review: text.to_string(),
            rating,
        }
    }

    fn pipeline(classifier: ScriptedClassifier) -> Arc<AnalysisPipeline<ScriptedClassifier>> {
        Arc::new(AnalysisPipeline::new(AspectDetector::default(), classifier))
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let classifier = ScriptedClassifier::new()
            .with_response("battery is awful", Sentiment::Negative, 0.9)
            .with_response("camera is superb", Sentiment::Positive, 0.8);
        let reviews: Vec<_> = (0..20)
            .map(|i| {
                let text = if i % 2 == 0 {
                    "battery is awful"
                } else {
                    "camera is superb"
                };
                review(Some(&format!("r{}", i)), text, None)
            })
            .collect();

        let results = analyze_batch(pipeline(classifier), reviews, 3).await;

        assert_eq!(results.len(), 20);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.id, format!("r{}", i));
            let expected = if i % 2 == 0 { "battery" } else { "camera" };
            assert!(result.aspects.contains_key(&Aspect::new(expected)));
        }
    }

    #[tokio::test]
    async fn test_missing_id_is_generated() {
        let results = analyze_batch(
            pipeline(ScriptedClassifier::new()),
            vec![review(None, "price is fine", Some(4.0))],
            1,
        )
        .await;

        assert_eq!(results.len(), 1);
        assert!(Uuid::parse_str(&results[0].id).is_ok());
        assert_eq!(results[0].rating, Some(4.0));
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let classifier = ScriptedClassifier::new().failing_on("battery exploded");
        let reviews = vec![
            review(Some("a"), "battery exploded", None),
            review(Some("b"), "camera works", None),
        ];

        let results = analyze_batch(pipeline(classifier), reviews, 0).await;

        assert!(!results[0].is_ok());
        assert!(results[0].aspects.is_empty());
        assert!(results[1].is_ok());

        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.records, 1);
    }

    #[test]
    fn test_records_flatten_verdicts() {
        let classifier = ScriptedClassifier::new()
            .with_response("screen and battery are poor", Sentiment::Negative, 0.7);
        let pipeline = pipeline(classifier);
        let aspects = pipeline.analyze_review("screen and battery are poor").unwrap();

        let result = BatchResult {
            id: "x".to_string(),
            rating: Some(5.0),
            aspects,
            error: None,
        };
        let records: Vec<_> = result.records().collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].aspect, Aspect::new("battery"));
        assert_eq!(records[1].aspect, Aspect::new("display"));
        assert!(records.iter().all(|r| r.review_id == "x" && r.rating == Some(5.0)));
    }

    #[test]
    fn test_read_reviews_skips_bad_lines() {
        let input = concat!(
            "{\"id\": \"1\", \"review\": \"Great camera\", \"rating\": 5}\n",
            "\n",
            "not json\n",
            "{\"id\": \"2\", \"review\": \"ok\", \"rating\": 9}\n",
            "{\"review\": \"battery died\"}\n",
        );

        let reviews = read_reviews(Cursor::new(input)).unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].id.as_deref(), Some("1"));
        assert_eq!(reviews[1].review, "battery died");
    }

    #[test]
    fn test_read_records() {
        let input = "{\"review_id\": \"1\", \"aspect\": \"Battery\", \"sentiment\": \"negative\", \"confidence\": 0.9, \"sentence\": \"battery died\"}\n";
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sentiment, Sentiment::Negative);
        assert!(records[0].rating.is_none());
    }
}
