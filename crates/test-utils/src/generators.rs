//! Deterministic point-set generators.
//!
//! These generators create reproducible location clouds without pulling a
//! random number generator into every test crate.

use heatmap_common::{GeoBoundingBox, GeoPoint};

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Pseudo-random value in [0, 1) for `(index, channel)`.
fn unit(index: u32, channel: u32, seed: u32) -> f64 {
    simple_hash(index, channel, seed) as f64 / (u32::MAX as f64 + 1.0)
}

/// Creates `count` points spread uniformly over a bounding box.
///
/// # Example
///
/// ```
/// use heatmap_common::GeoBoundingBox;
/// use test_utils::uniform_points;
///
/// let bbox = GeoBoundingBox::new(1.0, -1.0, 1.0, -1.0).unwrap();
/// let points = uniform_points(&bbox, 100, 7);
/// assert_eq!(points.len(), 100);
/// assert!(points.iter().all(|p| bbox.contains(p)));
/// ```
pub fn uniform_points(bbox: &GeoBoundingBox, count: usize, seed: u32) -> Vec<GeoPoint> {
    (0..count as u32)
        .map(|i| {
            let lat = bbox.south() + unit(i, 0, seed) * (bbox.north() - bbox.south());
            let lon = bbox.west() + unit(i, 1, seed) * (bbox.east() - bbox.west());
            GeoPoint::new(lat, lon)
        })
        .collect()
}

/// Creates `count` points scattered around a centre, at most `radius_deg`
/// away along each axis.
pub fn clustered_points(center: GeoPoint, radius_deg: f64, count: usize, seed: u32) -> Vec<GeoPoint> {
    (0..count as u32)
        .map(|i| {
            let dlat = (unit(i, 0, seed) * 2.0 - 1.0) * radius_deg;
            let dlon = (unit(i, 1, seed) * 2.0 - 1.0) * radius_deg;
            GeoPoint::new(center.lat + dlat, center.lon + dlon)
        })
        .collect()
}

/// Creates `count` copies of the same location.
pub fn repeated_point(point: GeoPoint, count: usize) -> Vec<GeoPoint> {
    vec![point; count]
}
