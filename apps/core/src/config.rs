//! Runtime configuration read from the environment (and `.env`).

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use validator::Validate;

use crate::absa::{
    AnalysisPipeline, AspectDetector, AspectDictionary, EmbeddingClassifier, LexiconClassifier,
    MatchMode, SentimentClassifier,
};
use crate::error::AppError;
use crate::fs_manager::PortablePathManager;

pub const CLASSIFIER_ENV: &str = "ABSA_CLASSIFIER";
pub const ASPECTS_PATH_ENV: &str = "ABSA_ASPECTS_PATH";
pub const MATCH_MODE_ENV: &str = "ABSA_MATCH_MODE";
pub const MODELS_DIR_ENV: &str = "ABSA_MODELS_DIR";
pub const BATCH_CONCURRENCY_ENV: &str = "ABSA_BATCH_CONCURRENCY";
pub const LOG_FORMAT_ENV: &str = "ABSA_LOG_FORMAT";

const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Pipeline built from configuration, with the backend chosen at runtime
pub type DynPipeline = AnalysisPipeline<Box<dyn SentimentClassifier>>;

/// Which sentiment backend to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    #[default]
    Lexicon,
    Embedding,
}

impl FromStr for ClassifierBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lexicon" => Ok(ClassifierBackend::Lexicon),
            "embedding" => Ok(ClassifierBackend::Embedding),
            other => Err(AppError::Config(format!(
                "Unknown classifier '{}' (expected 'lexicon' or 'embedding')",
                other
            ))),
        }
    }
}

/// Log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    /// Bunyan-style JSON lines
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "Unknown log format '{}' (expected 'pretty' or 'json')",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    pub classifier: ClassifierBackend,
    /// Explicit dictionary file; `None` falls back to `config/aspects.json`, then the built-in set
    pub aspects_path: Option<PathBuf>,
    pub match_mode: MatchMode,
    pub models_dir: PathBuf,
    /// Reviews analyzed in parallel by batch runs
    #[validate(range(min = 1, max = 64))]
    pub batch_concurrency: usize,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierBackend::default(),
            aspects_path: None,
            match_mode: MatchMode::default(),
            models_dir: PortablePathManager::models_dir(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            log_format: LogFormat::default(),
        }
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Read configuration from environment variables.
    ///
    /// Unset variables keep their defaults; invalid values are errors.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(value) = read_var(CLASSIFIER_ENV) {
            config.classifier = value.parse()?;
        }
        if let Some(value) = read_var(ASPECTS_PATH_ENV) {
            config.aspects_path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_var(MATCH_MODE_ENV) {
            config.match_mode = value.parse()?;
        }
        if let Some(value) = read_var(MODELS_DIR_ENV) {
            config.models_dir = PathBuf::from(value);
        }
        if let Some(value) = read_var(BATCH_CONCURRENCY_ENV) {
            config.batch_concurrency = value.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    BATCH_CONCURRENCY_ENV, value
                ))
            })?;
        }
        if let Some(value) = read_var(LOG_FORMAT_ENV) {
            config.log_format = value.parse()?;
        }

        config
            .validate()
            .map_err(|e| AppError::Config(format!("Invalid configuration: {}", e)))?;
        Ok(config)
    }

    /// Resolve and load the aspect dictionary
    pub fn load_dictionary(&self) -> Result<AspectDictionary, AppError> {
        if let Some(path) = &self.aspects_path {
            return AspectDictionary::load(path);
        }

        let default_path = PortablePathManager::default_aspects_path();
        if default_path.is_file() {
            return AspectDictionary::load(&default_path);
        }

        info!("Using built-in aspect dictionary");
        Ok(AspectDictionary::default())
    }

    pub fn build_detector(&self) -> Result<AspectDetector, AppError> {
        AspectDetector::new(self.load_dictionary()?, self.match_mode)
    }

    /// Load the configured classifier. Fails with `ModelUnavailable` if it cannot be loaded.
    pub fn build_classifier(&self) -> Result<Box<dyn SentimentClassifier>, AppError> {
        match self.classifier {
            ClassifierBackend::Lexicon => Ok(Box::new(LexiconClassifier::new())),
            ClassifierBackend::Embedding => {
                PortablePathManager::ensure_dir(&self.models_dir).map_err(|e| {
                    AppError::ModelUnavailable(format!(
                        "cannot create model directory {:?}: {}",
                        self.models_dir, e
                    ))
                })?;
                Ok(Box::new(EmbeddingClassifier::new(self.models_dir.clone())?))
            }
        }
    }

    /// Build the full pipeline, loading the classifier eagerly
    pub fn build_pipeline(&self) -> Result<DynPipeline, AppError> {
        let detector = self.build_detector()?;
        let classifier = self.build_classifier()?;
        Ok(AnalysisPipeline::new(detector, classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("lexicon".parse::<ClassifierBackend>().unwrap(), ClassifierBackend::Lexicon);
        assert_eq!(
            " Embedding ".parse::<ClassifierBackend>().unwrap(),
            ClassifierBackend::Embedding
        );
        assert!(matches!(
            "bert".parse::<ClassifierBackend>(),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_default_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.classifier, ClassifierBackend::Lexicon);
        assert_eq!(config.match_mode, MatchMode::Substring);
    }

    #[test]
    fn test_lexicon_pipeline_builds() {
        let tmp = tempfile::tempdir().unwrap();
        temp_env::with_var("ABSA_HOME", Some(tmp.path()), || {
            let pipeline = AppConfig::default().build_pipeline().unwrap();
            assert_eq!(pipeline.classifier().name(), "lexicon");
            assert_eq!(pipeline.detector().dictionary().len(), 6);
        });
    }
}
