//! Projected (tile-space) rectangles.

use serde::{Deserialize, Serialize};

/// A rectangle in normalized tile-space.
///
/// Tile-space y grows southward, so `ymin` is the northern edge and row 0 of
/// any raster aligned to the extent is its northernmost row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileExtent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl TileExtent {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Height over width.
    pub fn aspect(&self) -> f64 {
        self.height() / self.width()
    }

    /// Closed-interval containment.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    /// Tile-space coordinate of the centre of pixel `(col, row)` in a raster of
    /// `width` x `height` pixels covering this extent.
    pub fn pixel_center(&self, col: usize, row: usize, width: usize, height: usize) -> (f64, f64) {
        let x = self.xmin + (col as f64 + 0.5) / width as f64 * self.width();
        let y = self.ymin + (row as f64 + 0.5) / height as f64 * self.height();
        (x, y)
    }

    /// Cell `(col, row)` containing `(x, y)` in a `cols` x `rows` grid over this
    /// extent, or `None` when the point lies outside. The far edges belong to the
    /// last cell.
    pub fn cell_of(&self, x: f64, y: f64, cols: usize, rows: usize) -> Option<(usize, usize)> {
        if !self.contains(x, y) {
            return None;
        }
        let col = ((x - self.xmin) / self.width() * cols as f64) as usize;
        let row = ((y - self.ymin) / self.height() * rows as f64) as usize;
        Some((col.min(cols - 1), row.min(rows - 1)))
    }
}
