//! Error handling for the skillscope engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillScopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

pub type Result<T> = std::result::Result<T, SkillScopeError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for SkillScopeError {
    fn from(err: anyhow::Error) -> Self {
        SkillScopeError::AnalysisFailed(err.to_string())
    }
}
