//! Geographic bounding box and point types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{HeatmapError, HeatmapResult};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Points for a single heatmap layer, already filtered to the run's bounding box.
pub type PointSet = Vec<GeoPoint>;

/// Geographic window of a run, in degrees.
///
/// Serves both as the point filter and as the rendered extent. The box is a
/// plain longitude/latitude rectangle; it does not wrap the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundsFields")]
pub struct GeoBoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

#[derive(Deserialize)]
struct BoundsFields {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl TryFrom<BoundsFields> for GeoBoundingBox {
    type Error = HeatmapError;

    fn try_from(f: BoundsFields) -> Result<Self, Self::Error> {
        GeoBoundingBox::new(f.north, f.south, f.east, f.west)
    }
}

impl GeoBoundingBox {
    /// Create a validated bounding box.
    ///
    /// Latitudes must lie strictly between the poles, where the tile
    /// projection is undefined.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> HeatmapResult<Self> {
        if ![north, south, east, west].iter().all(|v| v.is_finite()) {
            return Err(HeatmapError::InvalidBounds(
                "all edges must be finite numbers".to_string(),
            ));
        }
        if north <= south {
            return Err(HeatmapError::InvalidBounds(format!(
                "north ({}) must be greater than south ({})",
                north, south
            )));
        }
        if east <= west {
            return Err(HeatmapError::InvalidBounds(format!(
                "east ({}) must be greater than west ({})",
                east, west
            )));
        }
        if north >= 90.0 || south <= -90.0 {
            return Err(HeatmapError::InvalidBounds(format!(
                "latitudes must lie strictly within (-90, 90), got {}..{}",
                south, north
            )));
        }
        if west < -180.0 || east > 180.0 {
            return Err(HeatmapError::InvalidBounds(format!(
                "longitudes must lie within [-180, 180], got {}..{}",
                west, east
            )));
        }

        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    /// Check if a point lies inside the box. All four edges are inclusive.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lon <= self.east
            && point.lon >= self.west
    }

    /// Centre of the box in degrees.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }
}

impl FromStr for GeoBoundingBox {
    type Err = HeatmapError;

    /// Parse "north,south,east,west".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(HeatmapError::InvalidBounds(format!(
                "'{}': expected 'north,south,east,west'",
                s
            )));
        }

        let mut edges = [0.0f64; 4];
        for (edge, part) in edges.iter_mut().zip(&parts) {
            *edge = part.parse().map_err(|_| {
                HeatmapError::InvalidBounds(format!("invalid number '{}'", part))
            })?;
        }

        GeoBoundingBox::new(edges[0], edges[1], edges[2], edges[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = GeoBoundingBox::new(1.0, -1.0, 1.0, -1.0).unwrap();
        assert!(bbox.contains(&GeoPoint::new(0.0, 0.0)));
        assert!(bbox.contains(&GeoPoint::new(1.0, 1.0)));
        assert!(bbox.contains(&GeoPoint::new(-1.0, -1.0)));
        assert!(!bbox.contains(&GeoPoint::new(1.0000001, 0.0)));
        assert!(!bbox.contains(&GeoPoint::new(0.0, -1.5)));
    }

    #[test]
    fn test_parse() {
        let bbox: GeoBoundingBox = "52.6, 52.3, 13.8, 13.1".parse().unwrap();
        assert_eq!(bbox.north(), 52.6);
        assert_eq!(bbox.south(), 52.3);
        assert_eq!(bbox.east(), 13.8);
        assert_eq!(bbox.west(), 13.1);
    }

    #[test]
    fn test_degenerate_rejected() {
        assert!(GeoBoundingBox::new(1.0, 1.0, 1.0, -1.0).is_err());
        assert!(GeoBoundingBox::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(GeoBoundingBox::new(90.0, 0.0, 1.0, -1.0).is_err());
        assert!(GeoBoundingBox::new(f64::NAN, 0.0, 1.0, -1.0).is_err());
    }
}
