//! Errors raised while loading fixture data.

use std::path::PathBuf;
use thiserror::Error;
use verdant_core::ValidationError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fixture: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid fixture: {0}")]
    Validation(#[from] ValidationError),
}

pub type SourceResult<T> = Result<T, SourceError>;
