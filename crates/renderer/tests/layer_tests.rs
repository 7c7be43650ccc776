//! End-to-end tests for layer construction and compositing.

use heatmap_common::{GeoBoundingBox, GeoPoint, Rgba, TileExtent};
use projection::{extent_for, project};
use renderer::{build_layer, Canvas, HeatmapLayer, LayerColor, LayerOptions, Palette};
use test_utils::{clustered_points, repeated_point, uniform_points};

// ============================================================================
// Helpers
// ============================================================================

fn bbox(n: f64, s: f64, e: f64, w: f64) -> GeoBoundingBox {
    GeoBoundingBox::new(n, s, e, w).unwrap()
}

fn options(bins: usize) -> LayerOptions {
    LayerOptions {
        bins,
        ..Default::default()
    }
}

/// Layer cell containing a geographic point.
fn cell_at(layer: &HeatmapLayer, lon: f64, lat: f64) -> (usize, usize) {
    let (x, y) = project(lon, lat);
    layer
        .extent
        .cell_of(x, y, layer.width, layer.height)
        .expect("point inside layer extent")
}

// ============================================================================
// Layer construction
// ============================================================================

#[test]
fn test_uniform_points_in_inner_box() {
    let outer = bbox(1.0, -1.0, 1.0, -1.0);
    let inner = bbox(0.25, -0.25, 0.25, -0.25);
    let points = uniform_points(&inner, 10_000, 7);
    let extent = extent_for(&outer);

    let layer = build_layer(
        &points,
        &extent,
        &options(100),
        &LayerColor::Palette(Palette::by_name("viridis").unwrap()),
    )
    .unwrap();

    assert_eq!(layer.width, 100);
    assert!((99..=101).contains(&layer.height));

    let (col, row) = cell_at(&layer, 0.0, 0.0);
    assert!(layer.pixel(col, row).a > 200);

    // Far from the inner box nothing is painted.
    let (col, row) = cell_at(&layer, -0.9, 0.9);
    assert_eq!(layer.pixel(col, row), Rgba::TRANSPARENT);
    let (col, row) = cell_at(&layer, 0.9, -0.9);
    assert_eq!(layer.pixel(col, row), Rgba::TRANSPARENT);
}

#[test]
fn test_points_outside_extent_are_ignored() {
    let extent = extent_for(&bbox(1.0, -1.0, 1.0, -1.0));
    let points = repeated_point(GeoPoint::new(10.0, 10.0), 500);
    let layer = build_layer(&points, &extent, &options(32), &LayerColor::Fixed(Rgba::WHITE)).unwrap();
    assert!(layer.is_transparent());
}

#[test]
fn test_empty_layer_is_transparent_for_any_palette() {
    let extent = extent_for(&bbox(1.0, -1.0, 1.0, -1.0));
    for name in Palette::available() {
        let palette = Palette::by_name(name).unwrap();
        let layer = build_layer(&[], &extent, &options(16), &LayerColor::Palette(palette)).unwrap();
        assert!(layer.is_transparent(), "palette {name}");
    }
}

#[test]
fn test_denser_cluster_is_more_opaque() {
    let extent = extent_for(&bbox(1.0, -1.0, 1.0, -1.0));
    let mut points = repeated_point(GeoPoint::new(0.5, 0.5), 200);
    points.extend(repeated_point(GeoPoint::new(-0.5, -0.5), 2));

    let layer = build_layer(&points, &extent, &options(50), &LayerColor::Fixed(Rgba::WHITE)).unwrap();
    let (c1, r1) = cell_at(&layer, 0.5, 0.5);
    let (c2, r2) = cell_at(&layer, -0.5, -0.5);
    assert!(layer.pixel(c2, r2).a > 0);
    assert!(layer.pixel(c1, r1).a > layer.pixel(c2, r2).a);
}

#[test]
fn test_fixed_color_rgb_is_exact() {
    let extent = extent_for(&bbox(1.0, -1.0, 1.0, -1.0));
    let points = clustered_points(GeoPoint::new(0.0, 0.0), 0.3, 2_000, 3);
    let color = Rgba::opaque(12, 200, 99);
    let layer = build_layer(&points, &extent, &options(64), &LayerColor::Fixed(color)).unwrap();

    assert!(!layer.is_transparent());
    for px in layer.pixels.chunks_exact(4).filter(|px| px[3] > 0) {
        assert_eq!(&px[..3], &[12, 200, 99]);
    }
}

#[test]
fn test_alpha_cap_bounds_every_cell() {
    let extent = extent_for(&bbox(1.0, -1.0, 1.0, -1.0));
    let points = repeated_point(GeoPoint::new(0.0, 0.0), 10_000);
    let opts = LayerOptions {
        bins: 20,
        alpha_cap: 0.4,
        ..Default::default()
    };
    let layer = build_layer(&points, &extent, &opts, &LayerColor::Fixed(Rgba::WHITE)).unwrap();
    assert!(layer.pixels.chunks_exact(4).all(|px| px[3] <= 102));
    assert!(layer.pixels.chunks_exact(4).any(|px| px[3] >= 100));
}

#[test]
fn test_invalid_options_rejected() {
    let extent = TileExtent::new(0.0, 1.0, 0.0, 1.0);
    let err = build_layer(&[], &extent, &options(0), &LayerColor::Fixed(Rgba::WHITE)).unwrap_err();
    assert!(err.is_configuration_error());
}

// ============================================================================
// Compositing
// ============================================================================

#[test]
fn test_later_layer_wins_where_both_dense() {
    let extent = extent_for(&bbox(1.0, -1.0, 1.0, -1.0));
    let points = repeated_point(GeoPoint::new(0.0, 0.0), 5_000);
    let red = build_layer(&points, &extent, &options(20), &LayerColor::Fixed(Rgba::opaque(255, 0, 0))).unwrap();
    let blue = build_layer(&points, &extent, &options(20), &LayerColor::Fixed(Rgba::opaque(0, 0, 255))).unwrap();

    let mut canvas = Canvas::new(40, 40, extent, Rgba::TRANSPARENT);
    canvas.draw_layer(&red);
    canvas.draw_layer(&blue);

    let (x, y) = project(0.0, 0.0);
    let (col, row) = canvas.pixel_at(x, y).unwrap();
    let px = canvas.pixel(col, row);
    assert!(px.b > 250 && px.r < 5, "got {px:?}");
}

#[test]
fn test_transparent_layer_leaves_canvas_unchanged() {
    let extent = extent_for(&bbox(1.0, -1.0, 1.0, -1.0));
    let empty = build_layer(&[], &extent, &options(10), &LayerColor::Fixed(Rgba::opaque(255, 0, 0))).unwrap();
    let background = Rgba::opaque(30, 40, 50);
    let mut canvas = Canvas::new(25, 25, extent, background);
    canvas.draw_layer(&empty);
    assert!(canvas.pixels().chunks_exact(4).all(|px| px == [30, 40, 50, 255]));
}

#[test]
fn test_single_point_survives_downsampling() {
    // Ten layer cells per canvas pixel, wider than a sigma 1 footprint.
    let extent = extent_for(&bbox(1.0, -1.0, 1.0, -1.0));
    let width = 100;
    let height = (width as f64 * extent.aspect()).round() as usize;

    for i in 0..5 {
        for j in 0..5 {
            let point = GeoPoint::new(0.8 - 0.4 * j as f64 - 0.017 * i as f64, -0.8 + 0.4 * i as f64 + 0.013 * j as f64);
            let layer = build_layer(&[point], &extent, &options(1_000), &LayerColor::Fixed(Rgba::opaque(255, 0, 0))).unwrap();
            assert!(!layer.is_transparent());

            let mut canvas = Canvas::new(width, height, extent, Rgba::TRANSPARENT);
            canvas.draw_layer(&layer);

            assert!(
                canvas.pixels().chunks_exact(4).any(|px| px[3] > 0),
                "point {point:?} vanished from the canvas"
            );
        }
    }
}
