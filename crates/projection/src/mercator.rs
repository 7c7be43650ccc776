//! Spherical (Web) Mercator in normalized tile space.
//!
//! Tile space maps the whole projected world onto [0, 1] x [0, 1], with
//! x growing eastward from the antimeridian and y growing southward from the
//! northern Mercator limit (~85.0511°). At zoom `z` the world is `2^z` tiles
//! wide, so a tile-space coordinate times `2^z` gives the tile index.

use std::f64::consts::PI;

use heatmap_common::{GeoBoundingBox, GeoPoint, TileExtent};

/// Standard slippy-map tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Project longitude/latitude in degrees to normalized tile space.
///
/// Latitudes at the poles yield non-finite `y`; callers exclude them upstream.
pub fn project(longitude: f64, latitude: f64) -> (f64, f64) {
    let x = (longitude + 180.0) / 360.0;
    let lat_rad = latitude.to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    (x, y)
}

/// Project every point of a set.
pub fn project_many(points: &[GeoPoint]) -> Vec<(f64, f64)> {
    points.iter().map(|p| project(p.lon, p.lat)).collect()
}

/// Inverse of [`project`]: tile space back to (longitude, latitude) in degrees.
pub fn unproject(x: f64, y: f64) -> (f64, f64) {
    let longitude = x * 360.0 - 180.0;
    let latitude = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    (longitude, latitude)
}

/// Tile-space rectangle covered by a bounding box.
///
/// The north edge maps to `ymin`.
pub fn extent_for(bbox: &GeoBoundingBox) -> TileExtent {
    let (xmin, ymin) = project(bbox.west(), bbox.north());
    let (xmax, ymax) = project(bbox.east(), bbox.south());
    TileExtent::new(xmin, xmax, ymin, ymax)
}

/// Number of tiles along one axis at a zoom level.
pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Global pixel coordinate of a tile-space point at a zoom level.
pub fn world_pixel(x: f64, y: f64, zoom: u8) -> (f64, f64) {
    let scale = tiles_per_axis(zoom) as f64 * TILE_SIZE as f64;
    (x * scale, y * scale)
}

/// Native pixel size of an extent when drawn from tiles at a zoom level.
pub fn native_size(extent: &TileExtent, zoom: u8) -> (f64, f64) {
    let scale = tiles_per_axis(zoom) as f64 * TILE_SIZE as f64;
    (extent.width() * scale, extent.height() * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let (x, y) = project(0.0, 0.0);
        assert!((x - 0.5).abs() < 1e-12);
        assert!((y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_antimeridian() {
        assert_eq!(project(-180.0, 10.0).0, 0.0);
        assert_eq!(project(180.0, 10.0).0, 1.0);
    }

    #[test]
    fn test_mercator_limit_maps_to_edges() {
        let limit = 85.051_128_779_806_59;
        assert!(project(0.0, limit).1.abs() < 1e-9);
        assert!((project(0.0, -limit).1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_extent_orientation() {
        let bbox = GeoBoundingBox::new(1.0, -1.0, 1.0, -1.0).unwrap();
        let extent = extent_for(&bbox);
        assert!(extent.xmin < extent.xmax);
        assert!(extent.ymin < extent.ymax);
        // Symmetric box around the origin stays centred on 0.5.
        assert!(((extent.xmin + extent.xmax) / 2.0 - 0.5).abs() < 1e-12);
        assert!(((extent.ymin + extent.ymax) / 2.0 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_native_size_doubles_per_zoom() {
        let extent = TileExtent::new(0.25, 0.5, 0.25, 0.5);
        let (w0, h0) = native_size(&extent, 0);
        let (w1, h1) = native_size(&extent, 1);
        assert_eq!(w0, 64.0);
        assert_eq!(h0, 64.0);
        assert_eq!(w1, 2.0 * w0);
        assert_eq!(h1, 2.0 * h0);
    }
}
