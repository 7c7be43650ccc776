//! Basemaps assembled from a local slippy-map tile directory.
//!
//! Tiles live at `<root>/<source slug>/<z>/<x>/<y>.png`, the layout produced
//! by most tile downloaders. Each canvas pixel takes the nearest pixel of the
//! tile under its centre.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use heatmap_common::{GeoBoundingBox, HeatmapError, HeatmapResult, Rgba};
use image::RgbaImage;
use projection::mercator::{tiles_per_axis, world_pixel, TILE_SIZE};
use projection::extent_for;
use renderer::Canvas;
use tracing::{debug, info, warn};

use crate::{Basemap, BasemapRequest, TileSource};

/// Fill color for tiles that are not on disk.
pub const DEFAULT_FALLBACK: Rgba = Rgba::opaque(242, 242, 240);

/// Draws basemaps from pre-fetched tiles.
#[derive(Debug, Clone)]
pub struct TileDirectoryBasemap {
    root: PathBuf,
    source: TileSource,
    fallback: Rgba,
}

impl TileDirectoryBasemap {
    pub fn new(root: impl Into<PathBuf>, source: TileSource) -> Self {
        Self {
            root: root.into(),
            source,
            fallback: DEFAULT_FALLBACK,
        }
    }

    /// Use `color` where tiles are missing.
    pub fn with_fallback(mut self, color: Rgba) -> Self {
        self.fallback = color;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> TileSource {
        self.source
    }

    /// Location of one tile on disk.
    pub fn tile_path(&self, zoom: u8, x: u32, y: u32) -> PathBuf {
        self.root
            .join(self.source.slug())
            .join(zoom.to_string())
            .join(x.to_string())
            .join(format!("{}.png", y))
    }

    /// Decode one tile; `Ok(None)` when the file does not exist.
    fn load_tile(&self, zoom: u8, x: u32, y: u32) -> HeatmapResult<Option<RgbaImage>> {
        let path = self.tile_path(zoom, x, y);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), zoom, x, y, "Basemap tile missing, using fallback color");
                return Ok(None);
            }
            Err(e) => {
                return Err(HeatmapError::TileError(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let tile = image::load_from_memory(&bytes)
            .map_err(|e| HeatmapError::TileError(format!("failed to decode {}: {}", path.display(), e)))?
            .to_rgba8();
        if tile.width() == 0 || tile.height() == 0 {
            return Err(HeatmapError::TileError(format!("{} is empty", path.display())));
        }

        debug!(path = %path.display(), width = tile.width(), height = tile.height(), "Loaded tile");
        Ok(Some(tile))
    }
}

/// Nearest pixel of `tile` at offset (`dx`, `dy`) in [0, TILE_SIZE) tile units.
///
/// Tiles that are not 256 px (e.g. high-DPI 512 px) are scaled to fit.
fn sample(tile: &RgbaImage, dx: f64, dy: f64) -> Rgba {
    let scale_x = tile.width() as f64 / TILE_SIZE as f64;
    let scale_y = tile.height() as f64 / TILE_SIZE as f64;
    let px = ((dx * scale_x) as u32).min(tile.width() - 1);
    let py = ((dy * scale_y) as u32).min(tile.height() - 1);
    let [r, g, b, a] = tile.get_pixel(px, py).0;
    Rgba::new(r, g, b, a)
}

impl Basemap for TileDirectoryBasemap {
    fn draw(&self, bbox: &GeoBoundingBox, request: &BasemapRequest) -> HeatmapResult<Canvas> {
        request.validate()?;
        let start = Instant::now();
        let zoom = request.zoom;
        let extent = extent_for(bbox);
        let (width, height) = request.canvas_size(&extent);

        let last_tile = tiles_per_axis(zoom) - 1;
        let tile_size = TILE_SIZE as f64;
        let mut tiles: HashMap<(u32, u32), Option<RgbaImage>> = HashMap::new();
        let mut pixels = Vec::with_capacity(width * height * 4);

        for row in 0..height {
            for col in 0..width {
                let (x, y) = extent.pixel_center(col, row, width, height);
                let (wx, wy) = world_pixel(x, y, zoom);
                let tx = ((wx / tile_size).max(0.0) as u32).min(last_tile);
                let ty = ((wy / tile_size).max(0.0) as u32).min(last_tile);

                let tile = match tiles.entry((tx, ty)) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => entry.insert(self.load_tile(zoom, tx, ty)?),
                };
                let color = match tile {
                    Some(tile) => sample(
                        tile,
                        wx - tx as f64 * tile_size,
                        wy - ty as f64 * tile_size,
                    ),
                    None => self.fallback,
                };
                pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
            }
        }

        let missing = tiles.values().filter(|t| t.is_none()).count();
        info!(
            source = %self.source,
            zoom,
            width,
            height,
            tiles = tiles.len(),
            missing_tiles = missing,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Drew basemap"
        );

        Canvas::from_rgba(width, height, extent, pixels)
    }
}
