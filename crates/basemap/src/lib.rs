//! Background maps for heatmap canvases.
//!
//! A [`Basemap`] produces the [`Canvas`] every layer is composited onto. The
//! canvas carries the tile-space extent of the requested bounding box, so layers
//! built over the same extent line up pixel for pixel.

mod plain;
mod source;
mod tiles;

pub use plain::PlainBasemap;
pub use source::TileSource;
pub use tiles::{TileDirectoryBasemap, DEFAULT_FALLBACK};

use heatmap_common::{GeoBoundingBox, HeatmapError, HeatmapResult, TileExtent};
use renderer::Canvas;

/// Highest zoom level served by common tile providers.
pub const MAX_ZOOM: u8 = 22;

/// Upper bound on either canvas dimension.
pub const MAX_DIMENSION: usize = 8192;

/// Default tile zoom level.
pub const DEFAULT_ZOOM: u8 = 12;

/// Size and detail of the basemap to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasemapRequest {
    pub zoom: u8,
    /// Output width in pixels; `None` uses the native tile resolution.
    pub width: Option<u32>,
}

impl Default for BasemapRequest {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            width: None,
        }
    }
}

impl BasemapRequest {
    pub fn validate(&self) -> HeatmapResult<()> {
        if self.zoom > MAX_ZOOM {
            return Err(HeatmapError::invalid_option(
                "zoom",
                format!("must be at most {}, got {}", MAX_ZOOM, self.zoom),
            ));
        }
        match self.width {
            Some(0) => Err(HeatmapError::invalid_option("width", "must be at least 1")),
            Some(w) if w as usize > MAX_DIMENSION => Err(HeatmapError::invalid_option(
                "width",
                format!("must be at most {}, got {}", MAX_DIMENSION, w),
            )),
            _ => Ok(()),
        }
    }

    /// Canvas dimensions for `extent`.
    ///
    /// The width is the requested one or the extent's native size at the
    /// zoom level; the height follows the extent's aspect ratio. Both are
    /// scaled down together if either exceeds [`MAX_DIMENSION`].
    pub fn canvas_size(&self, extent: &TileExtent) -> (usize, usize) {
        let width = match self.width {
            Some(w) => w as f64,
            None => projection::mercator::native_size(extent, self.zoom).0,
        };
        let height = width * extent.aspect();

        let shrink = (MAX_DIMENSION as f64 / width.max(height)).min(1.0);
        let width = ((width * shrink).round() as usize).max(1);
        let height = ((height * shrink).round() as usize).max(1);
        (width, height)
    }
}

/// Something that can draw the background for a bounding box.
pub trait Basemap {
    fn draw(&self, bbox: &GeoBoundingBox, request: &BasemapRequest) -> HeatmapResult<Canvas>;
}
