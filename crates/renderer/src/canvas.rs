//! Shared output raster and alpha compositing.

use std::ops::Range;

use heatmap_common::{HeatmapError, HeatmapResult, Rgba, TileExtent};
use rayon::prelude::*;

use crate::layer::HeatmapLayer;
use crate::png;

/// RGBA raster covering a tile-space extent. Row 0 is the northern edge.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub extent: TileExtent,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with one color.
    pub fn new(width: usize, height: usize, extent: TileExtent, background: Rgba) -> Self {
        let pixels = [background.r, background.g, background.b, background.a]
            .iter()
            .copied()
            .cycle()
            .take(width * height * 4)
            .collect();
        Self {
            width,
            height,
            extent,
            pixels,
        }
    }

    /// Wrap existing RGBA pixel data (4 bytes per pixel, row-major).
    pub fn from_rgba(width: usize, height: usize, extent: TileExtent, pixels: Vec<u8>) -> HeatmapResult<Self> {
        if pixels.len() != width * height * 4 {
            return Err(HeatmapError::RenderError(format!(
                "canvas buffer has {} bytes, expected {} for {}x{}",
                pixels.len(),
                width * height * 4,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            extent,
            pixels,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, col: usize, row: usize) -> Rgba {
        let i = (row * self.width + col) * 4;
        Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    pub fn set_pixel(&mut self, col: usize, row: usize, color: Rgba) {
        let i = (row * self.width + col) * 4;
        self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    /// Canvas pixel containing a tile-space point, if it is on the canvas.
    pub fn pixel_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        self.extent.cell_of(x, y, self.width, self.height)
    }

    /// Composite a layer over the canvas with source-over blending.
    ///
    /// A canvas pixel covering several layer cells takes the most opaque of
    /// them, so no painted cell is lost when the layer is finer than the
    /// canvas. Otherwise it takes the cell under its centre. Pixels outside the
    /// layer's extent are left untouched.
    pub fn draw_layer(&mut self, layer: &HeatmapLayer) {
        let (width, height) = (self.width, self.height);
        let extent = self.extent;

        let target = layer.extent;

        // Columns and rows are independent, so resolve each axis once.
        let col_map: Vec<Option<Range<usize>>> = (0..width)
            .map(|col| {
                let lo = extent.xmin + col as f64 / width as f64 * extent.width();
                let hi = extent.xmin + (col + 1) as f64 / width as f64 * extent.width();
                axis_span(lo, hi, target.xmin, target.xmax, layer.width)
            })
            .collect();
        let row_map: Vec<Option<Range<usize>>> = (0..height)
            .map(|row| {
                let lo = extent.ymin + row as f64 / height as f64 * extent.height();
                let hi = extent.ymin + (row + 1) as f64 / height as f64 * extent.height();
                axis_span(lo, hi, target.ymin, target.ymax, layer.height)
            })
            .collect();

        self.pixels
            .par_chunks_mut(width * 4)
            .zip(row_map.par_iter())
            .for_each(|(canvas_row, layer_rows)| {
                let Some(layer_rows) = layer_rows else {
                    return;
                };
                for (col, layer_cols) in col_map.iter().enumerate() {
                    let Some(layer_cols) = layer_cols else {
                        continue;
                    };
                    let src = most_opaque(layer, layer_rows, layer_cols);
                    if src.a == 0 {
                        continue;
                    }
                    let px = &mut canvas_row[col * 4..col * 4 + 4];
                    let dst = Rgba::new(px[0], px[1], px[2], px[3]);
                    let out = blend_over(dst, src);
                    px.copy_from_slice(&[out.r, out.g, out.b, out.a]);
                }
            });
    }

    /// Encode the canvas as PNG.
    pub fn encode_png(&self) -> HeatmapResult<Vec<u8>> {
        png::create_png_auto(&self.pixels, self.width, self.height)
    }
}

/// Layer cells covered by the pixel span `[lo, hi]` when `[min, max]` is split
/// into `n` cells. A span no wider than one cell maps to the cell under its
/// centre.
fn axis_span(lo: f64, hi: f64, min: f64, max: f64, n: usize) -> Option<Range<usize>> {
    if n == 0 || !(max > min) {
        return None;
    }
    let scale = n as f64 / (max - min);
    if (hi - lo) * scale <= 1.0 {
        return axis_cell((lo + hi) / 2.0, min, max, n).map(|i| i..i + 1);
    }
    if !(hi > min && lo < max) {
        return None;
    }
    let start = ((lo - min) * scale).floor().max(0.0) as usize;
    let end = (((hi - min) * scale).ceil() as usize).min(n);
    (start < end).then(|| start..end)
}

/// Index of the cell containing `v` when `[min, max]` is split into `n` cells.
fn axis_cell(v: f64, min: f64, max: f64, n: usize) -> Option<usize> {
    if n == 0 || !(v >= min && v <= max) {
        return None;
    }
    let i = ((v - min) / (max - min) * n as f64) as usize;
    Some(i.min(n - 1))
}

/// Highest-alpha cell in a block of the layer; the first one wins ties.
fn most_opaque(layer: &HeatmapLayer, rows: &Range<usize>, cols: &Range<usize>) -> Rgba {
    let mut best = Rgba::TRANSPARENT;
    for row in rows.clone() {
        for col in cols.clone() {
            let px = layer.pixel(col, row);
            if px.a > best.a {
                best = px;
            }
        }
    }
    best
}

/// Source-over compositing of straight-alpha colors.
pub fn blend_over(dst: Rgba, src: Rgba) -> Rgba {
    if src.a == 255 || dst.a == 0 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }

    let sa = src.a as f64 / 255.0;
    let da = dst.a as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| -> u8 {
        ((s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a).round() as u8
    };

    Rgba::new(
        channel(src.r, dst.r),
        channel(src.g, dst.g),
        channel(src.b, dst.b),
        (out_a * 255.0).round() as u8,
    )
}
