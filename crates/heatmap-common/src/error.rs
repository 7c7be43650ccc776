//! Error types for geo-heatmap.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for heatmap rendering runs.
#[derive(Debug, Error)]
pub enum HeatmapError {
    // === Configuration Errors ===
    #[error("Color list has {actual} entries but {expected} layers were given")]
    ColorCountMismatch { expected: usize, actual: usize },

    #[error("Invalid color specification: {0}")]
    InvalidColorSpec(String),

    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    #[error("Inputs mix single files and merged groups; every layer must have the same shape")]
    MixedInputShapes,

    #[error("No input point sets given")]
    NoInputs,

    #[error("Invalid bounding box: {0}")]
    InvalidBounds(String),

    #[error("Invalid value for '{option}': {message}")]
    InvalidOption { option: String, message: String },

    // === Data Errors ===
    #[error("Failed to load '{path}': {message}")]
    DataError { path: String, message: String },

    // === Rendering Errors ===
    #[error("Tile error: {0}")]
    TileError(String),

    #[error("Rendering failed: {0}")]
    RenderError(String),

    // === Output Errors ===
    #[error("Failed to write output: {0}")]
    OutputError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HeatmapError {
    /// Shorthand for an [`HeatmapError::InvalidOption`].
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        HeatmapError::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by the run's configuration rather than its data.
    ///
    /// These are raised before any input is read or anything is drawn.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            HeatmapError::ColorCountMismatch { .. }
                | HeatmapError::InvalidColorSpec(_)
                | HeatmapError::UnknownPalette(_)
                | HeatmapError::MixedInputShapes
                | HeatmapError::NoInputs
                | HeatmapError::InvalidBounds(_)
                | HeatmapError::InvalidOption { .. }
        )
    }

    /// True for errors surfaced by the point loader.
    pub fn is_data_error(&self) -> bool {
        matches!(self, HeatmapError::DataError { .. })
    }
}
