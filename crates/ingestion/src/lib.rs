//! Point ingestion for heatmap layers.
//!
//! Reads location-history exports (`{"locations": [{"latitudeE7", "longitudeE7"}, ...]}`),
//! rescales the E7 integers to degrees and keeps the points inside the map's
//! bounding box. Each [`InputGroup`](heatmap_common::InputGroup) becomes one
//! point set; merged groups are concatenated in file order.

pub mod error;
pub mod loader;

// Re-exports
pub use error::{IngestionError, Result};
pub use loader::{load_group, load_locations, parse_locations, LocationHistoryLoader, PointLoader};
