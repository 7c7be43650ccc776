//! Multi-layer heatmap rendering.
//!
//! Everything that can be rejected from the request alone (options, color
//! list length, palette names, input shapes) is checked before any file is
//! read. Points are then loaded, the basemap drawn once and the layers
//! composited in input order. The PNG is written exactly once at the end.

use std::path::PathBuf;
use std::time::Instant;

use basemap::{Basemap, BasemapRequest};
use heatmap_common::{
    validate_homogeneous, ColorSpec, GeoBoundingBox, HeatmapError, HeatmapResult, InputGroup,
    PointSet,
};
use ingestion::PointLoader;
use renderer::{build_layer, resolve_layer_colors, Canvas, LayerColor, LayerOptions};
use tracing::{debug, info, info_span};

use crate::output::OutputDir;

/// Rendering knobs shared by every layer of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderOptions {
    pub layer: LayerOptions,
    pub basemap: BasemapRequest,
}

impl RenderOptions {
    pub fn validate(&self) -> HeatmapResult<()> {
        self.layer.validate()?;
        self.basemap.validate()
    }
}

/// One map: which inputs, how to color them, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// One entry per layer, drawn in this order.
    pub inputs: Vec<InputGroup>,
    pub colors: ColorSpec,
    pub bbox: GeoBoundingBox,
    pub options: RenderOptions,
}

/// Check the request and resolve one color per layer without touching disk.
pub fn prepare(request: &RenderRequest) -> HeatmapResult<Vec<LayerColor>> {
    request.options.validate()?;

    if let ColorSpec::PerLayer(entries) = &request.colors {
        if entries.len() != request.inputs.len() {
            return Err(HeatmapError::ColorCountMismatch {
                expected: request.inputs.len(),
                actual: entries.len(),
            });
        }
    }
    let colors = resolve_layer_colors(&request.colors, request.inputs.len())?;
    validate_homogeneous(&request.inputs)?;

    Ok(colors)
}

/// Draw the basemap and every layer; returns the finished canvas.
pub fn compose(
    request: &RenderRequest,
    basemap: &dyn Basemap,
    loader: &dyn PointLoader,
) -> HeatmapResult<Canvas> {
    let colors = prepare(request)?;

    let point_sets: Vec<PointSet> = request
        .inputs
        .iter()
        .map(|group| loader.load(group, &request.bbox))
        .collect::<HeatmapResult<_>>()?;

    let mut canvas = basemap.draw(&request.bbox, &request.options.basemap)?;
    let extent = canvas.extent;

    for (index, (points, color)) in point_sets.iter().zip(&colors).enumerate() {
        let span = info_span!("layer", index, points = points.len());
        let _guard = span.enter();

        let start = Instant::now();
        let layer = build_layer(points, &extent, &request.options.layer, color)?;
        canvas.draw_layer(&layer);
        debug!(
            bins_x = layer.width,
            bins_y = layer.height,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Composited layer"
        );
    }

    Ok(canvas)
}

/// Render the request and persist it as the next free `map_N.png`.
pub fn render(
    request: &RenderRequest,
    basemap: &dyn Basemap,
    loader: &dyn PointLoader,
    output: &OutputDir,
) -> HeatmapResult<PathBuf> {
    let start = Instant::now();
    info!(
        layers = request.inputs.len(),
        bins = request.options.layer.bins,
        sigma = request.options.layer.sigma,
        zoom = request.options.basemap.zoom,
        "Rendering heatmap"
    );

    let canvas = compose(request, basemap, loader)?;
    let png = canvas.encode_png()?;
    let path = output.persist(&png)?;

    info!(
        path = %path.display(),
        width = canvas.width,
        height = canvas.height,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Heatmap rendered"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_common::Rgba;

    fn request(inputs: Vec<InputGroup>, colors: ColorSpec) -> RenderRequest {
        RenderRequest {
            inputs,
            colors,
            bbox: GeoBoundingBox::new(1.0, -1.0, 1.0, -1.0).unwrap(),
            options: RenderOptions::default(),
        }
    }

    #[test]
    fn test_prepare_checks_color_count_first() {
        // Mixed shapes too, but the color list is checked earlier.
        let req = request(
            vec![InputGroup::Single("a".into()), InputGroup::Merged(vec!["b".into()])],
            ColorSpec::PerLayer(vec![ColorSpec::Fixed(Rgba::WHITE)]),
        );
        assert!(matches!(
            prepare(&req),
            Err(HeatmapError::ColorCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_prepare_rejects_no_inputs() {
        let req = request(vec![], ColorSpec::Named("viridis".into()));
        assert!(matches!(prepare(&req), Err(HeatmapError::NoInputs)));
    }

    #[test]
    fn test_prepare_rejects_bad_options() {
        let mut req = request(
            vec![InputGroup::Single("a".into())],
            ColorSpec::Named("viridis".into()),
        );
        req.options.basemap.zoom = 40;
        assert!(prepare(&req).unwrap_err().is_configuration_error());
    }
}
