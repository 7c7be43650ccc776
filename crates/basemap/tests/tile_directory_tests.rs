//! Drawing basemaps from tiles written to a temporary directory.

use std::path::Path;

use basemap::{Basemap, BasemapRequest, PlainBasemap, TileDirectoryBasemap, TileSource};
use heatmap_common::{GeoBoundingBox, HeatmapError, Rgba};
use test_utils::temp_dir;

// ============================================================================
// Helpers
// ============================================================================

/// Write a solid 256x256 tile for the given source.
fn write_tile(root: &Path, source: TileSource, z: u8, x: u32, y: u32, color: [u8; 4]) {
    let dir = root.join(source.slug()).join(z.to_string()).join(x.to_string());
    std::fs::create_dir_all(&dir).unwrap();
    image::RgbaImage::from_pixel(256, 256, image::Rgba(color))
        .save(dir.join(format!("{y}.png")))
        .unwrap();
}

/// Box straddling the equator and prime meridian, covering all four zoom-1 tiles.
fn quadrants() -> GeoBoundingBox {
    GeoBoundingBox::new(40.0, -40.0, 90.0, -90.0).unwrap()
}

fn request(width: u32) -> BasemapRequest {
    BasemapRequest {
        zoom: 1,
        width: Some(width),
    }
}

// ============================================================================
// Tile directory
// ============================================================================

#[test]
fn test_each_quadrant_samples_its_tile() {
    let dir = temp_dir();
    let source = TileSource::CartoLightNoLabels;
    write_tile(dir.path(), source, 1, 0, 0, [255, 0, 0, 255]);
    write_tile(dir.path(), source, 1, 1, 0, [0, 255, 0, 255]);
    write_tile(dir.path(), source, 1, 0, 1, [0, 0, 255, 255]);
    // (1, 1) deliberately missing

    let fallback = Rgba::opaque(9, 9, 9);
    let basemap = TileDirectoryBasemap::new(dir.path(), source).with_fallback(fallback);
    let canvas = basemap.draw(&quadrants(), &request(64)).unwrap();

    assert_eq!(canvas.width, 64);
    let (w, h) = (canvas.width, canvas.height);
    assert_eq!(canvas.pixel(0, 0), Rgba::opaque(255, 0, 0));
    assert_eq!(canvas.pixel(w - 1, 0), Rgba::opaque(0, 255, 0));
    assert_eq!(canvas.pixel(0, h - 1), Rgba::opaque(0, 0, 255));
    assert_eq!(canvas.pixel(w - 1, h - 1), fallback);
}

#[test]
fn test_missing_directory_uses_fallback_everywhere() {
    let dir = temp_dir();
    let basemap = TileDirectoryBasemap::new(dir.path().join("nothing-here"), TileSource::OpenStreetMap);
    let canvas = basemap.draw(&quadrants(), &request(16)).unwrap();
    assert!(canvas
        .pixels()
        .chunks_exact(4)
        .all(|px| px == [242, 242, 240, 255]));
}

#[test]
fn test_sources_do_not_share_tiles() {
    let dir = temp_dir();
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        write_tile(dir.path(), TileSource::CartoDark, 1, x, y, [20, 20, 20, 255]);
    }
    let dark = TileDirectoryBasemap::new(dir.path(), TileSource::CartoDark);
    let light = TileDirectoryBasemap::new(dir.path(), TileSource::CartoLight).with_fallback(Rgba::WHITE);

    assert_eq!(dark.draw(&quadrants(), &request(8)).unwrap().pixel(4, 2), Rgba::opaque(20, 20, 20));
    assert_eq!(light.draw(&quadrants(), &request(8)).unwrap().pixel(4, 2), Rgba::WHITE);
}

#[test]
fn test_corrupt_tile_is_tile_error() {
    let dir = temp_dir();
    let tile_dir = dir.path().join("osm").join("1").join("0");
    std::fs::create_dir_all(&tile_dir).unwrap();
    std::fs::write(tile_dir.join("0.png"), b"definitely not a png").unwrap();

    let basemap = TileDirectoryBasemap::new(dir.path(), TileSource::OpenStreetMap);
    let err = basemap.draw(&quadrants(), &request(8)).unwrap_err();
    assert!(matches!(err, HeatmapError::TileError(_)));
}

#[test]
fn test_invalid_zoom_rejected_before_reading() {
    let dir = temp_dir();
    let basemap = TileDirectoryBasemap::new(dir.path(), TileSource::OpenStreetMap);
    let err = basemap
        .draw(
            &quadrants(),
            &BasemapRequest {
                zoom: 30,
                width: None,
            },
        )
        .unwrap_err();
    assert!(err.is_configuration_error());
}

// ============================================================================
// Plain
// ============================================================================

#[test]
fn test_plain_basemap_extent_and_color() {
    let bbox = quadrants();
    let canvas = PlainBasemap::new(Rgba::opaque(1, 2, 3))
        .draw(&bbox, &request(100))
        .unwrap();
    assert_eq!(canvas.extent, projection::extent_for(&bbox));
    assert_eq!(canvas.width, 100);
    assert!(canvas.height > 0);
    assert_eq!(canvas.pixel(50, canvas.height / 2), Rgba::opaque(1, 2, 3));
}
