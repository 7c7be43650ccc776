//! YAML map configuration.
//!
//! Every field is optional; command-line flags override whatever the file sets.
//!
//! ```yaml
//! inputs:
//!   - history/2021.json
//!   - history/2022.json
//! color: [Reds, "#1f77b4"]
//! bbox: { north: 52.56, south: 52.46, east: 13.48, west: 13.30 }
//! zoom: 13
//! bins: 2000
//! sigma: 1.5
//! tile_source: carto-dark
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use heatmap_common::{ColorSpec, GeoBoundingBox, InputGroup};
use serde::Deserialize;

/// Default palette when no color is given anywhere.
pub const DEFAULT_COLOR: &str = "viridis";
/// Default tile root.
pub const DEFAULT_TILE_DIR: &str = "tiles";
/// Default directory for rendered maps.
pub const DEFAULT_OUTPUT_DIR: &str = "maps";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// One entry per layer: a path, or a list of paths merged into one layer.
    pub inputs: Vec<InputGroup>,
    pub color: Option<ColorSpec>,
    pub bbox: Option<GeoBoundingBox>,
    pub zoom: Option<u8>,
    pub width: Option<u32>,
    /// Tile style slug, or `none` for a transparent background.
    pub tile_source: Option<String>,
    pub tile_dir: Option<PathBuf>,
    pub bins: Option<usize>,
    pub sigma: Option<f64>,
    pub alpha: Option<f64>,
    pub output_dir: Option<PathBuf>,
}

impl MapConfig {
    /// Parse a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Failed to parse map configuration")
    }

    /// Read and parse a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid config file: {}", path.display()))
    }
}
