//! Pipeline Tests
//!
//! End-to-end review analysis: the documented scenarios with a scripted
//! classifier, and realistic reviews through the lexicon classifier.

use std::sync::Arc;

use crate::absa::testing::ScriptedClassifier;
use crate::absa::{
    aggregate, AnalysisPipeline, Aspect, AspectDetector, LexiconClassifier, Observation,
    Sentiment, SentimentClassifier,
};
use crate::error::AppError;
use crate::models::to_boundary;

fn scripted_pipeline(classifier: ScriptedClassifier) -> AnalysisPipeline<ScriptedClassifier> {
    AnalysisPipeline::new(AspectDetector::default(), classifier)
}

fn lexicon_pipeline() -> AnalysisPipeline<LexiconClassifier> {
    AnalysisPipeline::new(AspectDetector::default(), LexiconClassifier::new())
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_aggregate_keeps_highest_confidence() {
        let verdicts = aggregate(vec![
            Observation::new("battery", Sentiment::Negative, 0.91, "battery drains fast"),
            Observation::new("battery", Sentiment::Neutral, 0.55, "battery is okay"),
        ]);

        assert_eq!(verdicts.len(), 1);
        let battery = &verdicts[&Aspect::new("battery")];
        assert_eq!(battery.sentiment, Sentiment::Negative);
        assert_eq!(battery.confidence, 0.91);
        assert_eq!(battery.clause, "battery drains fast");
    }

    #[test]
    fn test_contrastive_review_end_to_end() {
        let classifier = ScriptedClassifier::new()
            .with_response("Great camera", Sentiment::Positive, 0.80)
            .with_response("terrible battery", Sentiment::Negative, 0.93);
        let pipeline = scripted_pipeline(classifier);

        let result = pipeline
            .analyze_review("Great camera but terrible battery.")
            .unwrap();

        let keys: Vec<&str> = result.keys().map(|a| a.as_str()).collect();
        assert_eq!(keys, vec!["camera", "battery"]);

        let camera = &result[&Aspect::new("camera")];
        assert_eq!(camera.sentiment, Sentiment::Positive);
        assert_eq!(camera.confidence, 0.8);
        assert_eq!(camera.sentence, "Great camera");

        let battery = &result[&Aspect::new("battery")];
        assert_eq!(battery.sentiment, Sentiment::Negative);
        assert_eq!(battery.confidence, 0.93);
        assert_eq!(battery.sentence, "terrible battery");
    }

    #[test]
    fn test_boundary_json_shape() {
        let classifier =
            ScriptedClassifier::new().with_response("camera is superb", Sentiment::Positive, 0.97531);
        let pipeline = scripted_pipeline(classifier);

        let result = pipeline.analyze_review("camera is superb").unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "camera": {
                    "sentiment": "positive",
                    "confidence": 0.975f32,
                    "sentence": "camera is superb"
                }
            })
        );
    }
}

#[cfg(test)]
mod aggregation_flow_tests {
    use super::*;

    #[test]
    fn test_repeated_aspect_keeps_strongest_clause() {
        let classifier = ScriptedClassifier::new()
            .with_response("battery is okay", Sentiment::Neutral, 0.55)
            .with_response("battery drains overnight", Sentiment::Negative, 0.91)
            .with_response("battery charges quickly", Sentiment::Positive, 0.62);
        let pipeline = scripted_pipeline(classifier);

        let result = pipeline
            .analyze_review("battery is okay. battery drains overnight! battery charges quickly")
            .unwrap();

        assert_eq!(result.len(), 1);
        let battery = &result[&Aspect::new("battery")];
        assert_eq!(battery.sentiment, Sentiment::Negative);
        assert_eq!(battery.sentence, "battery drains overnight");
    }

    #[test]
    fn test_tie_keeps_first_clause() {
        let pipeline = scripted_pipeline(
            ScriptedClassifier::new().with_fallback(Sentiment::Positive, 0.7),
        );

        let result = pipeline
            .analyze_review("the camera is nice. the camera is sharp")
            .unwrap();

        assert_eq!(result[&Aspect::new("camera")].sentence, "the camera is nice");
    }

    #[test]
    fn test_verdicts_equal_reaggregation() {
        let classifier = ScriptedClassifier::new()
            .with_response("screen is dim", Sentiment::Negative, 0.81)
            .with_response("display is sharp", Sentiment::Positive, 0.77);
        let pipeline = scripted_pipeline(classifier);

        let analysis = pipeline
            .analyze("screen is dim but display is sharp")
            .unwrap();
        let again = aggregate(analysis.verdicts.values().cloned());

        assert_eq!(analysis.verdicts, again);
        assert_eq!(to_boundary(&again), to_boundary(&analysis.verdicts));
    }

    #[test]
    fn test_failure_aborts_review() {
        let classifier = ScriptedClassifier::new()
            .with_response("camera is great", Sentiment::Positive, 0.9)
            .failing_on("price is silly");
        let pipeline = scripted_pipeline(classifier);

        let err = pipeline
            .analyze_review("camera is great. price is silly")
            .unwrap_err();
        assert!(matches!(err, AppError::Classification(_)));
    }
}

#[cfg(test)]
mod lexicon_pipeline_tests {
    use super::*;

    #[test]
    fn test_lexicon_contrastive_review() {
        let pipeline = lexicon_pipeline();
        let result = pipeline
            .analyze_review("Great camera but terrible battery.")
            .unwrap();

        assert_eq!(result[&Aspect::new("camera")].sentiment, Sentiment::Positive);
        assert_eq!(result[&Aspect::new("battery")].sentiment, Sentiment::Negative);
        for verdict in result.values() {
            assert!(verdict.confidence > 0.5 && verdict.confidence <= 1.0);
        }
    }

    #[test]
    fn test_lexicon_mixed_review() {
        let pipeline = lexicon_pipeline();
        let report = pipeline
            .report(
                "I love the display, it is bright and sharp. However the price is awful. \
                 Shipping took a week.",
            )
            .unwrap();

        assert_eq!(report.classifier, "lexicon");
        assert_eq!(
            report.aspects[&Aspect::new("display")].sentiment,
            Sentiment::Positive
        );
        assert_eq!(report.aspects[&Aspect::new("price")].sentiment, Sentiment::Negative);
        assert_eq!(report.stats.sentences, 3);
        assert_eq!(report.stats.skipped_clauses, 1);
    }

    #[test]
    fn test_shared_pipeline_across_threads() {
        let pipeline = Arc::new(lexicon_pipeline());
        let expected = pipeline.analyze_review("terrible battery").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pipeline = Arc::clone(&pipeline);
                std::thread::spawn(move || pipeline.analyze_review("terrible battery").unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_boxed_classifier_pipeline() {
        let classifier: Box<dyn SentimentClassifier> = Box::new(LexiconClassifier::new());
        let pipeline = AnalysisPipeline::new(AspectDetector::default(), classifier);
        let sentence = pipeline.classify_sentence("This phone is excellent").unwrap();
        assert_eq!(sentence.sentiment, Sentiment::Positive);
        assert_eq!(pipeline.classifier().name(), "lexicon");
    }
}
