//! Separable Gaussian smoothing.
//!
//! Kernels are truncated at four standard deviations and normalized to sum to
//! one. Borders use half-sample symmetric reflection (`d c b a | a b c d | d c b a`),
//! so total mass is preserved along each axis.

use rayon::prelude::*;

use crate::density::DensityGrid;

/// Kernel half-width in standard deviations.
pub const TRUNCATE: f64 = 4.0;

/// Normalized 1D Gaussian weights for offsets `-radius..=radius`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / two_sigma_sq).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= sum;
    }
    weights
}

/// Map an out-of-range index back into `0..n` by mirror reflection.
#[inline]
fn reflect(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Smooth a grid with a Gaussian of standard deviation `sigma` bins.
///
/// `sigma == 0` returns the grid unchanged.
pub fn gaussian_filter(grid: &DensityGrid, sigma: f64) -> DensityGrid {
    if sigma <= 0.0 || grid.data.is_empty() {
        return grid.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let (width, height) = (grid.width, grid.height);

    // Horizontal pass
    let mut horizontal = vec![0.0f64; width * height];
    horizontal
        .par_chunks_mut(width)
        .zip(grid.data.par_chunks(width))
        .for_each(|(out_row, in_row)| {
            for (col, out) in out_row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for (k, w) in kernel.iter().enumerate() {
                    let src = reflect(col as isize + k as isize - radius, width);
                    acc += w * in_row[src];
                }
                *out = acc;
            }
        });

    // Vertical pass
    let mut smoothed = vec![0.0f64; width * height];
    smoothed
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out_row)| {
            for (k, w) in kernel.iter().enumerate() {
                let src = reflect(row as isize + k as isize - radius, height);
                let src_row = &horizontal[src * width..(src + 1) * width];
                for (out, v) in out_row.iter_mut().zip(src_row) {
                    *out += w * v;
                }
            }
        });

    DensityGrid {
        width,
        height,
        data: smoothed,
    }
}
