//! PNG encoding for RGBA canvases.
//!
//! Two output layouts:
//! - **Indexed (color type 3)** when the image has at most 256 distinct RGBA
//!   values. Alpha goes into a `tRNS` chunk.
//! - **Truecolor with alpha (color type 6)** otherwise.
//!
//! Heatmaps over a plain background usually fit a palette; anything drawn over
//! basemap tiles falls back to RGBA.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use heatmap_common::{HeatmapError, HeatmapResult, Rgba};
use rayon::prelude::*;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Largest palette an 8-bit indexed PNG can carry.
const MAX_PALETTE_SIZE: usize = 256;

/// Below this many pixels the palette scan runs on one thread.
const PARALLEL_THRESHOLD: usize = 64 * 64;

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Palette plus one index per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedImage {
    pub palette: Vec<Rgba>,
    pub indices: Vec<u8>,
}

/// Encode RGBA pixels, choosing indexed output when the colors fit.
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> HeatmapResult<Vec<u8>> {
    check_dimensions(pixels, width, height)?;

    match index_colors(pixels) {
        Some(indexed) => create_png_indexed(&indexed, width, height),
        None => create_png_rgba(pixels, width, height),
    }
}

/// Encode RGBA pixels as a color type 6 PNG.
pub fn create_png_rgba(pixels: &[u8], width: usize, height: usize) -> HeatmapResult<Vec<u8>> {
    check_dimensions(pixels, width, height)?;

    let mut png = Vec::with_capacity(pixels.len() / 2);
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, COLOR_TYPE_RGBA));
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width * 4, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode an already indexed image as a color type 3 PNG.
pub fn create_png_indexed(image: &IndexedImage, width: usize, height: usize) -> HeatmapResult<Vec<u8>> {
    if image.palette.is_empty() || image.palette.len() > MAX_PALETTE_SIZE {
        return Err(HeatmapError::RenderError(format!(
            "palette must hold 1..={} colors, got {}",
            MAX_PALETTE_SIZE,
            image.palette.len()
        )));
    }
    if image.indices.len() != width * height {
        return Err(HeatmapError::RenderError(format!(
            "expected {} palette indices for {}x{}, got {}",
            width * height,
            width,
            height,
            image.indices.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, COLOR_TYPE_INDEXED));

    let plte: Vec<u8> = image
        .palette
        .iter()
        .flat_map(|c| [c.r, c.g, c.b])
        .collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if image.palette.iter().any(|c| c.a < 255) {
        let trns: Vec<u8> = image.palette.iter().map(|c| c.a).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(&image.indices, width, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Build a palette for `pixels`, or `None` if there are more than 256 colors.
///
/// Palette order follows first appearance for small images. Large images are
/// scanned in parallel and the order is unspecified.
pub fn index_colors(pixels: &[u8]) -> Option<IndexedImage> {
    if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        index_colors_parallel(pixels)
    } else {
        index_colors_sequential(pixels)
    }
}

#[inline(always)]
fn pack(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

#[inline(always)]
fn unpack(packed: u32) -> Rgba {
    let [r, g, b, a] = packed.to_le_bytes();
    Rgba::new(r, g, b, a)
}

fn index_colors_sequential(pixels: &[u8]) -> Option<IndexedImage> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let key = pack(px);
        let index = match lookup.get(&key) {
            Some(&i) => i,
            None => {
                if palette.len() == MAX_PALETTE_SIZE {
                    return None;
                }
                let i = palette.len() as u8;
                palette.push(unpack(key));
                lookup.insert(key, i);
                i
            }
        };
        indices.push(index);
    }

    Some(IndexedImage { palette, indices })
}

fn index_colors_parallel(pixels: &[u8]) -> Option<IndexedImage> {
    let chunk_pixels = (pixels.len() / 4 / rayon::current_num_threads()).max(256);

    // Per-chunk distinct colors; a chunk stops early once it alone overflows.
    let distinct: Vec<HashSet<u32>> = pixels
        .par_chunks(chunk_pixels * 4)
        .map(|chunk| {
            let mut seen = HashSet::with_capacity(MAX_PALETTE_SIZE + 1);
            for px in chunk.chunks_exact(4) {
                seen.insert(pack(px));
                if seen.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            seen
        })
        .collect();

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    for key in distinct.into_iter().flatten() {
        if lookup.contains_key(&key) {
            continue;
        }
        if palette.len() == MAX_PALETTE_SIZE {
            return None;
        }
        lookup.insert(key, palette.len() as u8);
        palette.push(unpack(key));
    }

    let indices: Vec<u8> = pixels
        .par_chunks_exact(4)
        .map(|px| lookup.get(&pack(px)).copied().unwrap_or(0))
        .collect();

    Some(IndexedImage { palette, indices })
}

fn check_dimensions(pixels: &[u8], width: usize, height: usize) -> HeatmapResult<()> {
    if width == 0 || height == 0 {
        return Err(HeatmapError::RenderError(format!(
            "cannot encode an empty {}x{} image",
            width, height
        )));
    }
    if width > u32::MAX as usize || height > u32::MAX as usize {
        return Err(HeatmapError::RenderError(format!(
            "image {}x{} exceeds PNG limits",
            width, height
        )));
    }
    if pixels.len() != width * height * 4 {
        return Err(HeatmapError::RenderError(format!(
            "pixel buffer has {} bytes, expected {}",
            pixels.len(),
            width * height * 4
        )));
    }
    Ok(())
}

fn ihdr(width: usize, height: usize, color_type: u8) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&(width as u32).to_be_bytes());
    data[4..8].copy_from_slice(&(height as u32).to_be_bytes());
    data[8] = 8; // bit depth
    data[9] = color_type;
    // compression, filter and interlace methods stay 0
    data
}

/// Length, type, data, CRC over type and data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Zlib-compress scanlines, each prefixed with filter type 0.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> HeatmapResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let compression_error = |e: std::io::Error| HeatmapError::RenderError(format!("IDAT compression failed: {}", e));
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).map_err(compression_error)?;
    encoder.finish().map_err(compression_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_colors_simple() {
        let pixels = [
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
            255, 0, 0, 255,
        ];
        let indexed = index_colors(&pixels).unwrap();
        assert_eq!(indexed.palette.len(), 3);
        assert_eq!(indexed.palette[0], Rgba::opaque(255, 0, 0));
        assert_eq!(indexed.indices, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_index_colors_parallel_matches_palette_lookup() {
        let mut pixels = Vec::with_capacity(128 * 128 * 4);
        for y in 0..128u32 {
            for x in 0..128u32 {
                let shade = ((x / 8 + y / 8) % 40) as u8;
                pixels.extend_from_slice(&[shade * 5, 255 - shade, 0, 200]);
            }
        }
        let indexed = index_colors(&pixels).unwrap();
        assert_eq!(indexed.palette.len(), 31);
        for (px, &i) in pixels.chunks_exact(4).zip(&indexed.indices) {
            assert_eq!(indexed.palette[i as usize], Rgba::new(px[0], px[1], px[2], px[3]));
        }
    }

    #[test]
    fn test_too_many_colors() {
        let pixels: Vec<u8> = (0..300u32).flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 0, 255]).collect();
        assert!(index_colors(&pixels).is_none());
    }

    #[test]
    fn test_signature_and_chunk_order() {
        let pixels = [0, 0, 0, 0, 255, 255, 255, 128];
        let png = create_png_auto(&pixels, 2, 1).unwrap();
        assert_eq!(&png[0..8], &SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(png[8 + 8 + 9], COLOR_TYPE_INDEXED);
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_rgba_fallback_color_type() {
        let pixels: Vec<u8> = (0..300u32).flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7, 255]).collect();
        let png = create_png_auto(&pixels, 300, 1).unwrap();
        assert_eq!(png[8 + 8 + 9], COLOR_TYPE_RGBA);
    }

    #[test]
    fn test_rejects_bad_buffers() {
        assert!(create_png_auto(&[0; 12], 2, 2).is_err());
        assert!(create_png_auto(&[], 0, 0).is_err());
        let image = IndexedImage {
            palette: vec![Rgba::WHITE],
            indices: vec![0; 3],
        };
        assert!(create_png_indexed(&image, 2, 2).is_err());
    }
}
