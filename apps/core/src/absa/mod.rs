//! # ABSA Module
//!
//! Aspect-based sentiment analysis for product reviews.
//!
//! ## Components
//! - `sentence`: sentence segmentation on `.`, `!`, `?`
//! - `clause`: clause segmentation on contrastive connectives
//! - `aspect`: aspect labels and the trigger phrase dictionary
//! - `detector`: dictionary-based aspect detection
//! - `classifier`: the sentiment classifier capability
//! - `lexicon`: rule-based classifier (no model file)
//! - `semantic`: embedding-based classifier (FastEmbed)
//! - `aggregator`: highest-confidence verdict per aspect
//! - `pipeline`: main orchestrator
//! - `report`: output data structure
//! - `testing`: deterministic classifier doubles (test builds only)

pub mod aggregator;
pub mod aspect;
pub mod classifier;
pub mod clause;
pub mod detector;
pub mod lexicon;
pub mod pipeline;
pub mod report;
pub mod semantic;
pub mod sentence;
#[cfg(test)]
pub mod testing;

pub use aggregator::{aggregate, AggregatedVerdicts, Observation};
pub use aspect::{Aspect, AspectDictionary, MatchMode};
pub use classifier::{Classification, LabelScore, Sentiment, SentimentClassifier};
pub use clause::ClauseSegmenter;
pub use detector::AspectDetector;
pub use lexicon::LexiconClassifier;
pub use pipeline::{AnalysisPipeline, AnalysisStats, ReviewAnalysis};
pub use report::ReviewReport;
pub use semantic::EmbeddingClassifier;
pub use sentence::SentenceSegmenter;
