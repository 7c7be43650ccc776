//! Geo density heatmap renderer.
//!
//! Loads one point set per input group, bins and smooths each into an RGBA
//! layer over a shared tile-space extent, composites the layers in order onto a
//! basemap and writes a single PNG that never overwrites earlier output.

pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;

pub use cli::{Args, RunSettings};
pub use config::MapConfig;
pub use output::OutputDir;
pub use pipeline::{compose, render, RenderOptions, RenderRequest};
