//! Common types and utilities shared across the geo-heatmap crates.

pub mod bbox;
pub mod color;
pub mod error;
pub mod extent;
pub mod input;

pub use bbox::{GeoBoundingBox, GeoPoint, PointSet};
pub use color::{ColorSpec, Rgba};
pub use error::{HeatmapError, HeatmapResult};
pub use extent::TileExtent;
pub use input::{validate_homogeneous, InputGroup, InputShape};
