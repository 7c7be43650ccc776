//! Density heatmap rendering.
//!
//! Turns point sets into RGBA layers and composites them:
//! - 2D histograms over a shared tile-space extent
//! - log compression and Gaussian smoothing
//! - palette / fixed-color shading with a density-driven alpha ramp
//! - source-over compositing onto a [`Canvas`] and PNG encoding

pub mod canvas;
pub mod density;
pub mod layer;
pub mod opacity;
pub mod palette;
pub mod png;
pub mod smoothing;

pub use canvas::{blend_over, Canvas};
pub use density::DensityGrid;
pub use layer::{build_layer, HeatmapLayer, LayerOptions, DEFAULT_BINS, NO_DATA_EPSILON};
pub use opacity::{opacity, DEFAULT_OPACITY_SCALE};
pub use palette::{resolve_layer_colors, LayerColor, Palette};
pub use png::create_png_auto;
