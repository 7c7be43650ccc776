//! Density to alpha mapping.
//!
//! `alpha = max(0, max_alpha - 1 / (scale * density + 1))`
//!
//! Empty cells are fully transparent (for `max_alpha <= 1`), sparse cells fade
//! in smoothly and dense cells approach `max_alpha`. A higher `scale` makes
//! low densities look opaque sooner.

/// Default ramp steepness.
pub const DEFAULT_OPACITY_SCALE: f64 = 100.0;

/// Alpha in [0, max_alpha] for a non-negative density.
#[inline]
pub fn opacity(density: f64, scale: f64, max_alpha: f64) -> f64 {
    (-1.0 / (scale * density + 1.0) + max_alpha).max(0.0)
}

/// Element-wise [`opacity`] over a whole grid.
pub fn opacity_grid(densities: &[f64], scale: f64, max_alpha: f64) -> Vec<f64> {
    densities
        .iter()
        .map(|&d| opacity(d, scale, max_alpha))
        .collect()
}

/// Convert a unit alpha to an 8-bit channel.
#[inline]
pub fn alpha_to_u8(alpha: f64) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}
