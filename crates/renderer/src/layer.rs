//! Heatmap layer construction.
//!
//! One layer is built per point set:
//! 1. project points to tile space
//! 2. bin them over the shared extent (square cells)
//! 3. compress counts with `ln(count + 1)`
//! 4. Gaussian smoothing
//! 5. colorize and assign alpha from the opacity curve
//!
//! Cells whose smoothed value does not exceed [`NO_DATA_EPSILON`] are "no
//! data" and always fully transparent, whatever the palette's low color is.

use std::time::Instant;

use heatmap_common::{GeoPoint, HeatmapError, HeatmapResult, Rgba, TileExtent};
use tracing::debug;

use crate::density::{histogram2d, log_compress, rows_for, DensityGrid};
use crate::opacity::{alpha_to_u8, opacity, DEFAULT_OPACITY_SCALE};
use crate::palette::LayerColor;
use crate::smoothing::gaussian_filter;

/// Smoothed values at or below this are treated as empty.
pub const NO_DATA_EPSILON: f64 = 1e-9;

/// Default number of columns.
pub const DEFAULT_BINS: usize = 3000;

/// Per-layer rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerOptions {
    /// Number of columns; rows follow from the extent's aspect ratio.
    pub bins: usize,
    /// Gaussian standard deviation in bins.
    pub sigma: f64,
    /// Maximum alpha any cell may reach.
    pub alpha_cap: f64,
    /// Steepness of the opacity ramp.
    pub opacity_scale: f64,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            sigma: 1.0,
            alpha_cap: 1.0,
            opacity_scale: DEFAULT_OPACITY_SCALE,
        }
    }
}

impl LayerOptions {
    pub fn validate(&self) -> HeatmapResult<()> {
        if self.bins == 0 {
            return Err(HeatmapError::invalid_option("bins", "must be at least 1"));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(HeatmapError::invalid_option(
                "sigma",
                format!("must be a non-negative number, got {}", self.sigma),
            ));
        }
        if !(self.alpha_cap > 0.0 && self.alpha_cap <= 1.0) {
            return Err(HeatmapError::invalid_option(
                "alpha",
                format!("must lie in (0, 1], got {}", self.alpha_cap),
            ));
        }
        if !(self.opacity_scale.is_finite() && self.opacity_scale > 0.0) {
            return Err(HeatmapError::invalid_option(
                "opacity_scale",
                format!("must be positive, got {}", self.opacity_scale),
            ));
        }
        Ok(())
    }
}

/// RGBA raster of one layer, aligned to `extent`.
///
/// Row 0 is the northern edge and column 0 the western edge. `extent` holds
/// the outer bin edges.
#[derive(Debug, Clone)]
pub struct HeatmapLayer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
    pub extent: TileExtent,
}

impl HeatmapLayer {
    pub fn pixel(&self, col: usize, row: usize) -> Rgba {
        let i = (row * self.width + col) * 4;
        Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    /// Number of cells with non-zero alpha.
    pub fn visible_cells(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    pub fn is_transparent(&self) -> bool {
        self.visible_cells() == 0
    }
}

/// Smoothed log-density of a point set over `extent`.
pub fn density_grid(points: &[GeoPoint], extent: &TileExtent, options: &LayerOptions) -> DensityGrid {
    let projected = projection::project_many(points);
    let rows = rows_for(options.bins, extent);
    let mut grid = histogram2d(&projected, extent, options.bins, rows);
    log_compress(&mut grid);
    gaussian_filter(&grid, options.sigma)
}

/// Turn a smoothed grid into RGBA.
pub fn colorize(
    grid: &DensityGrid,
    extent: &TileExtent,
    color: &LayerColor,
    options: &LayerOptions,
) -> HeatmapLayer {
    let mut pixels = vec![0u8; grid.data.len() * 4];

    for (value, px) in grid.data.iter().zip(pixels.chunks_exact_mut(4)) {
        if *value <= NO_DATA_EPSILON || value.is_nan() {
            continue;
        }
        let rgb = color.shade(*value);
        let alpha = opacity(*value, options.opacity_scale, options.alpha_cap);
        px.copy_from_slice(&[rgb.r, rgb.g, rgb.b, alpha_to_u8(alpha)]);
    }

    HeatmapLayer {
        width: grid.width,
        height: grid.height,
        pixels,
        extent: *extent,
    }
}

/// Build the RGBA layer for one point set.
pub fn build_layer(
    points: &[GeoPoint],
    extent: &TileExtent,
    options: &LayerOptions,
    color: &LayerColor,
) -> HeatmapResult<HeatmapLayer> {
    options.validate()?;
    if !(extent.width() > 0.0 && extent.height() > 0.0) {
        return Err(HeatmapError::RenderError(format!(
            "degenerate extent {:?}",
            extent
        )));
    }

    let start = Instant::now();
    let grid = density_grid(points, extent, options);
    let layer = colorize(&grid, extent, color, options);

    debug!(
        points = points.len(),
        bins_x = layer.width,
        bins_y = layer.height,
        visible_cells = layer.visible_cells(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Built heatmap layer"
    );

    Ok(layer)
}
