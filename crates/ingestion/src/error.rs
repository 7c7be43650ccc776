//! Error types for the ingestion crate.

use std::path::PathBuf;

use heatmap_common::HeatmapError;
use thiserror::Error;

/// Errors that can occur while loading point files.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid coordinate in {} at location {index}: {message}", path.display())]
    InvalidCoordinate {
        path: PathBuf,
        index: usize,
        message: String,
    },

    #[error("Input group contains no files")]
    EmptyGroup,
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;

impl IngestionError {
    /// File the error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            IngestionError::FileRead { path, .. }
            | IngestionError::Json { path, .. }
            | IngestionError::InvalidCoordinate { path, .. } => Some(path),
            IngestionError::EmptyGroup => None,
        }
    }
}

impl From<IngestionError> for HeatmapError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::EmptyGroup => HeatmapError::invalid_option("input", err.to_string()),
            other => HeatmapError::DataError {
                path: other
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                message: match &other {
                    IngestionError::FileRead { source, .. } => source.to_string(),
                    IngestionError::Json { source, .. } => source.to_string(),
                    _ => other.to_string(),
                },
            },
        }
    }
}
