use thiserror::Error;

use crate::extract::JsonExtractionError;
use crate::llm::CompletionError;

/// Top-level error type for a matching run.
///
/// Per-profile and per-(facet, profile) failures never surface here — they
/// degrade to zero-score placeholders inside their stage. Anything that does
/// reach this type is fatal to the whole run.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("JSON extraction error: {0}")]
    Extraction(#[from] JsonExtractionError),

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
