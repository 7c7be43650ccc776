//! Location-history loading.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;

use heatmap_common::{GeoBoundingBox, GeoPoint, HeatmapResult, InputGroup, PointSet};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{IngestionError, Result};

/// Scale of the integer coordinates in location-history exports.
const E7: f64 = 1e7;

/// Source of the point set behind one layer.
///
/// The pipeline only talks to this trait, so tests can substitute in-memory
/// loaders.
pub trait PointLoader {
    /// Load every point of `group` that lies inside `bbox`.
    fn load(&self, group: &InputGroup, bbox: &GeoBoundingBox) -> HeatmapResult<PointSet>;
}

/// Reads location-history JSON files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationHistoryLoader;

impl PointLoader for LocationHistoryLoader {
    fn load(&self, group: &InputGroup, bbox: &GeoBoundingBox) -> HeatmapResult<PointSet> {
        Ok(load_group(group, bbox)?)
    }
}

#[derive(Debug, Deserialize)]
struct LocationHistory {
    locations: Vec<RawLocation>,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    #[serde(rename = "latitudeE7")]
    latitude_e7: E7Value,
    #[serde(rename = "longitudeE7")]
    longitude_e7: E7Value,
}

/// Exports store coordinates as integers, older ones sometimes as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum E7Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl E7Value {
    /// Integer value, truncating fractional input.
    fn to_integer(&self) -> std::result::Result<i64, String> {
        match self {
            E7Value::Int(v) => Ok(*v),
            E7Value::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
            E7Value::Float(v) => Err(format!("non-finite value {}", v)),
            E7Value::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("'{}' is not an integer", s)),
        }
    }
}

/// Parse a location-history document and keep the points inside `bbox`.
///
/// `path` is only used for error messages.
pub fn parse_locations<R: Read>(reader: R, path: &Path, bbox: &GeoBoundingBox) -> Result<PointSet> {
    let history: LocationHistory =
        serde_json::from_reader(reader).map_err(|source| IngestionError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let mut points = Vec::with_capacity(history.locations.len());
    for (index, raw) in history.locations.iter().enumerate() {
        let invalid = |message: String| IngestionError::InvalidCoordinate {
            path: path.to_path_buf(),
            index,
            message,
        };
        let lat = raw.latitude_e7.to_integer().map_err(invalid)? as f64 / E7;
        let lon = raw.longitude_e7.to_integer().map_err(invalid)? as f64 / E7;

        let point = GeoPoint::new(lat, lon);
        if bbox.contains(&point) {
            points.push(point);
        }
    }

    debug!(
        path = %path.display(),
        total = history.locations.len(),
        kept = points.len(),
        "Filtered locations to bounding box"
    );

    Ok(points)
}

/// Load one location-history file, keeping points inside `bbox` (inclusive).
pub fn load_locations(path: &Path, bbox: &GeoBoundingBox) -> Result<PointSet> {
    let start = Instant::now();
    let file = File::open(path).map_err(|source| IngestionError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let points = parse_locations(BufReader::new(file), path, bbox)?;

    info!(
        path = %path.display(),
        points = points.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Loaded location history"
    );

    Ok(points)
}

/// Load all files of a group and concatenate them in order.
pub fn load_group(group: &InputGroup, bbox: &GeoBoundingBox) -> Result<PointSet> {
    let paths = group.paths();
    if paths.is_empty() {
        return Err(IngestionError::EmptyGroup);
    }

    let mut points = Vec::new();
    for path in paths {
        points.extend(load_locations(path, bbox)?);
    }
    Ok(points)
}
