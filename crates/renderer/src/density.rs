//! 2D binning of projected points.

use heatmap_common::TileExtent;

/// Row-major grid of per-bin values.
///
/// Columns run west to east (tile-space x), rows north to south (tile-space y),
/// so row 0 is the northern edge of the extent.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
}

impl DensityGrid {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.data[row * self.width + col]
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }
}

/// Number of rows that keeps cells square for `bins` columns over `extent`.
pub fn rows_for(bins: usize, extent: &TileExtent) -> usize {
    ((bins as f64 * extent.aspect()).round() as usize).max(1)
}

/// Count points per bin over `extent`.
///
/// Bins are half-open except the last along each axis, which also takes its
/// far edge. Points outside the extent, and non-finite projections, are
/// dropped.
pub fn histogram2d(points: &[(f64, f64)], extent: &TileExtent, cols: usize, rows: usize) -> DensityGrid {
    let mut grid = DensityGrid::zeros(cols, rows);
    for &(x, y) in points {
        if let Some((col, row)) = extent.cell_of(x, y, cols, rows) {
            grid.data[row * cols + col] += 1.0;
        }
    }
    grid
}

/// Replace every count with `ln(count + 1)`.
pub fn log_compress(grid: &mut DensityGrid) {
    for v in grid.data.iter_mut() {
        *v = v.ln_1p();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_for_keeps_aspect() {
        let extent = TileExtent::new(0.0, 1.0, 0.0, 0.5);
        assert_eq!(rows_for(100, &extent), 50);
        let flat = TileExtent::new(0.0, 1.0, 0.0, 0.001);
        assert_eq!(rows_for(100, &flat), 1);
    }

    #[test]
    fn test_histogram_counts_and_clipping() {
        let extent = TileExtent::new(0.0, 1.0, 0.0, 1.0);
        let points = [
            (0.1, 0.1),
            (0.1, 0.1),
            (0.9, 0.1),
            (1.0, 1.0),
            (1.5, 0.5),
            (f64::NAN, 0.5),
        ];
        let grid = histogram2d(&points, &extent, 2, 2);
        assert_eq!(grid.get(0, 0), 2.0);
        assert_eq!(grid.get(1, 0), 1.0);
        assert_eq!(grid.get(1, 1), 1.0);
        assert_eq!(grid.get(0, 1), 0.0);
        assert_eq!(grid.total(), 4.0);
    }

    #[test]
    fn test_log_compress() {
        let mut grid = DensityGrid {
            width: 3,
            height: 1,
            data: vec![0.0, 1.0, 9.0],
        };
        log_compress(&mut grid);
        assert_eq!(grid.data[0], 0.0);
        assert!((grid.data[1] - 2f64.ln()).abs() < 1e-12);
        assert!((grid.data[2] - 10f64.ln()).abs() < 1e-12);
    }
}
