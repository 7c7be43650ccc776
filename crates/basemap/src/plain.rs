//! Solid-color background.

use heatmap_common::{GeoBoundingBox, HeatmapResult, Rgba};
use projection::extent_for;
use renderer::Canvas;

use crate::{Basemap, BasemapRequest};

/// Fills the canvas with one color. With [`Rgba::TRANSPARENT`] the output
/// contains only the heatmap layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainBasemap {
    pub color: Rgba,
}

impl PlainBasemap {
    pub fn new(color: Rgba) -> Self {
        Self { color }
    }

    pub fn transparent() -> Self {
        Self::new(Rgba::TRANSPARENT)
    }
}

impl Basemap for PlainBasemap {
    fn draw(&self, bbox: &GeoBoundingBox, request: &BasemapRequest) -> HeatmapResult<Canvas> {
        request.validate()?;
        let extent = extent_for(bbox);
        let (width, height) = request.canvas_size(&extent);
        Ok(Canvas::new(width, height, extent, self.color))
    }
}
