//! Common test fixtures for geo-heatmap tests.
//!
//! Bounding boxes used across the suite and helpers that write
//! location-history files in the export format the loader reads.

use std::path::{Path, PathBuf};

use heatmap_common::GeoPoint;
use serde_json::{json, Value};

/// Common bounding box definitions for testing, as (north, south, east, west).
pub mod bbox {
    /// Two-degree box around the origin
    pub const ORIGIN: (f64, f64, f64, f64) = (1.0, -1.0, 1.0, -1.0);

    /// Central Berlin
    pub const BERLIN: (f64, f64, f64, f64) = (52.56, 52.46, 13.48, 13.30);

    /// San Francisco peninsula
    pub const SAN_FRANCISCO: (f64, f64, f64, f64) = (37.82, 37.70, -122.35, -122.52);
}

/// Encode a coordinate the way location-history exports do (degrees x 10^7).
pub fn to_e7(degrees: f64) -> i64 {
    (degrees * 1e7).round() as i64
}

/// Build a location-history document for the given points.
pub fn location_history_json(points: &[GeoPoint]) -> Value {
    let locations: Vec<Value> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            json!({
                "latitudeE7": to_e7(p.lat),
                "longitudeE7": to_e7(p.lon),
                "accuracy": 10 + (i % 40),
                "timestamp": format!("2021-06-01T12:{:02}:00Z", i % 60),
            })
        })
        .collect();
    json!({ "locations": locations })
}

/// Write a location-history file into `dir` and return its path.
pub fn write_location_history(dir: &Path, name: &str, points: &[GeoPoint]) -> PathBuf {
    let path = dir.join(name);
    let body = location_history_json(points).to_string();
    std::fs::write(&path, body).expect("failed to write location-history fixture");
    path
}

/// Temporary directory that is removed when dropped.
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("failed to create temporary directory")
}
