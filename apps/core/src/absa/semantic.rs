//! Embedding-based sentiment classifier using FastEmbed.
//!
//! Each label is described by a handful of prototype review phrases. The
//! clause is embedded with AllMiniLML6V2 and compared to every prototype by
//! cosine similarity; the per-label similarities are softmax-normalized into
//! a probability distribution.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use tracing::{info, warn};

use super::classifier::{softmax, Classification, LabelScore, Sentiment, SentimentClassifier};
use crate::error::AppError;

/// Cosine similarities live in [-1, 1]; a low temperature spreads them out
const SIMILARITY_TEMPERATURE: f32 = 0.05;

struct SentimentTemplate {
    sentiment: Sentiment,
    descriptions: &'static [&'static str],
}

const SENTIMENT_TEMPLATES: &[SentimentTemplate] = &[
    SentimentTemplate {
        sentiment: Sentiment::Positive,
        descriptions: &[
            "this is great, I love it",
            "excellent quality, works perfectly",
            "very happy with it, highly recommend",
            "fast, smooth and reliable",
        ],
    },
    SentimentTemplate {
        sentiment: Sentiment::Negative,
        descriptions: &[
            "this is terrible, I hate it",
            "poor quality, stopped working",
            "very disappointed, waste of money",
            "slow, laggy and unreliable",
        ],
    },
    SentimentTemplate {
        sentiment: Sentiment::Neutral,
        descriptions: &[
            "it is okay, nothing special",
            "average, as expected",
            "it works, neither good nor bad",
            "a plain factual description",
        ],
    },
];

/// Sentiment classifier backed by a local embedding model
pub struct EmbeddingClassifier {
    model: TextEmbedding,
    prototypes: Vec<(Sentiment, Vec<Vec<f32>>)>,
}

impl EmbeddingClassifier {
    /// Load the embedding model from `cache_dir` (downloading on first use)
    /// and pre-compute the prototype embeddings.
    ///
    /// Any failure is reported as [`AppError::ModelUnavailable`] so callers
    /// can refuse to start.
    pub fn new(cache_dir: PathBuf) -> Result<Self, AppError> {
        let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2);
        options.show_download_progress = false;
        options.cache_dir = cache_dir;

        let model = TextEmbedding::try_new(options).map_err(|e| {
            warn!("Failed to load embedding model for sentiment: {}", e);
            AppError::ModelUnavailable(format!("embedding model: {}", e))
        })?;

        info!("Pre-computing sentiment prototype embeddings...");
        let mut prototypes = Vec::with_capacity(SENTIMENT_TEMPLATES.len());
        for template in SENTIMENT_TEMPLATES {
            let embeddings = model
                .embed(template.descriptions.to_vec(), None)
                .map_err(|e| {
                    AppError::ModelUnavailable(format!(
                        "cannot embed {} prototypes: {}",
                        template.sentiment, e
                    ))
                })?;
            if embeddings.is_empty() {
                return Err(AppError::ModelUnavailable(format!(
                    "empty embeddings for {} prototypes",
                    template.sentiment
                )));
            }
            prototypes.push((template.sentiment, embeddings));
        }
        info!("Pre-computed prototypes for {} labels", prototypes.len());

        Ok(Self { model, prototypes })
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let mut embeddings = self
            .model
            .embed(vec![text], None)
            .map_err(|e| AppError::Classification(format!("Embedding error: {}", e)))?;
        embeddings
            .pop()
            .ok_or_else(|| AppError::Classification("Empty embedding".to_string()))
    }
}

impl SentimentClassifier for EmbeddingClassifier {
    fn classify(&self, text: &str) -> Result<Classification, AppError> {
        let query = self.embed(text)?;

        // Best-matching prototype per label
        let similarities: Vec<f32> = self
            .prototypes
            .iter()
            .map(|(_, embeddings)| {
                embeddings
                    .iter()
                    .map(|e| cosine_similarity(&query, e))
                    .fold(-1.0f32, f32::max)
            })
            .collect();

        let probabilities = softmax(&similarities, SIMILARITY_TEMPERATURE);
        let distribution = self
            .prototypes
            .iter()
            .zip(probabilities)
            .map(|((sentiment, _), probability)| LabelScore {
                sentiment: *sentiment,
                probability,
            })
            .collect();

        Classification::from_distribution(distribution)
    }

    fn name(&self) -> &'static str {
        "embedding"
    }
}

/// Calculate cosine similarity between two vectors
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
