use std::io;
use thiserror::Error;

/// Every failure the analysis core can report.
#[derive(Debug, Error)]
pub enum AppError {
    /// The sentiment classifier could not be loaded. Raised at startup, never per request.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// A classification call failed while analyzing a request.
    #[error("Classification error: {0}")]
    Classification(String),

    /// Reading input files or the dictionary failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed input at the boundary (bad JSON, oversized text).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad configuration, such as an unknown backend or an unusable dictionary.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker task died or some other bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::ModelUnavailable(s) => AppError::ModelUnavailable(s.clone()),
            AppError::Classification(s) => AppError::Classification(s.clone()),
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Config(format!("Invalid pattern: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Task failed: {}", err))
    }
}
