//! Command-line arguments and their merge with the config file.

use std::path::PathBuf;

use basemap::{BasemapRequest, TileSource, DEFAULT_ZOOM};
use clap::Parser;
use heatmap_common::{ColorSpec, GeoBoundingBox, HeatmapError, HeatmapResult, InputGroup};
use renderer::LayerOptions;

use crate::config::{MapConfig, DEFAULT_COLOR, DEFAULT_OUTPUT_DIR, DEFAULT_TILE_DIR};
use crate::pipeline::{RenderOptions, RenderRequest};

/// Value of `--tile-source` that disables tiles.
pub const NO_TILES: &str = "none";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "geo-heatmap")]
#[command(about = "Render location-history density heatmaps onto map tiles")]
#[command(version)]
pub struct Args {
    /// Location-history file; each one becomes a layer (repeatable)
    #[arg(short, long = "input", value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Comma-separated files merged into a single layer (repeatable)
    #[arg(short, long = "group", value_name = "FILE,FILE,...")]
    pub groups: Vec<String>,

    /// Palette name, color name, #RRGGBB[AA] or r,g,b[,a]; repeat once per layer
    #[arg(short, long = "color", value_name = "SPEC", allow_hyphen_values = true)]
    pub colors: Vec<String>,

    /// Bounding box as north,south,east,west in degrees
    #[arg(short, long, value_name = "N,S,E,W", allow_hyphen_values = true)]
    pub bbox: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub north: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub south: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub east: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub west: Option<f64>,

    /// Tile zoom level [default: 12]
    #[arg(short, long)]
    pub zoom: Option<u8>,

    /// Output width in pixels [default: native tile resolution]
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Tile style, or "none" for a transparent background [default: carto-light-no-labels]
    #[arg(long, value_name = "SOURCE")]
    pub tile_source: Option<String>,

    /// Root of the local tile directory [default: tiles]
    #[arg(long, env = "HEATMAP_TILE_DIR")]
    pub tile_dir: Option<PathBuf>,

    /// Number of histogram columns [default: 3000]
    #[arg(long)]
    pub bins: Option<usize>,

    /// Gaussian smoothing in bins [default: 1.0]
    #[arg(short, long)]
    pub sigma: Option<f64>,

    /// Maximum layer opacity in (0, 1] [default: 1.0]
    #[arg(short, long)]
    pub alpha: Option<f64>,

    /// Directory receiving map_N.png [default: maps]
    #[arg(short, long, env = "HEATMAP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

/// Fully resolved run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub request: RenderRequest,
    /// `None` renders onto a transparent background.
    pub tile_source: Option<TileSource>,
    pub tile_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl RunSettings {
    /// Merge command-line arguments over an optional config file.
    pub fn resolve(args: &Args, file: Option<MapConfig>) -> HeatmapResult<Self> {
        let file = file.unwrap_or_default();

        let inputs = if args.inputs.is_empty() && args.groups.is_empty() {
            file.inputs
        } else {
            cli_inputs(args)?
        };

        let colors = if args.colors.is_empty() {
            file.color
                .unwrap_or_else(|| ColorSpec::Named(DEFAULT_COLOR.to_string()))
        } else {
            ColorSpec::from_args(&args.colors)?
        };

        let bbox = match cli_bbox(args)? {
            Some(bbox) => bbox,
            None => file.bbox.ok_or_else(|| {
                HeatmapError::invalid_option(
                    "bbox",
                    "required: pass --bbox N,S,E,W, all of --north/--south/--east/--west, or set bbox in the config file",
                )
            })?,
        };

        let defaults = LayerOptions::default();
        let layer = LayerOptions {
            bins: args.bins.or(file.bins).unwrap_or(defaults.bins),
            sigma: args.sigma.or(file.sigma).unwrap_or(defaults.sigma),
            alpha_cap: args.alpha.or(file.alpha).unwrap_or(defaults.alpha_cap),
            opacity_scale: defaults.opacity_scale,
        };
        let basemap = BasemapRequest {
            zoom: args.zoom.or(file.zoom).unwrap_or(DEFAULT_ZOOM),
            width: args.width.or(file.width),
        };

        let tile_source = match args.tile_source.as_deref().or(file.tile_source.as_deref()) {
            None => Some(TileSource::default()),
            Some(s) if s.trim().eq_ignore_ascii_case(NO_TILES) => None,
            Some(s) => Some(s.parse()?),
        };

        Ok(Self {
            request: RenderRequest {
                inputs,
                colors,
                bbox,
                options: RenderOptions { layer, basemap },
            },
            tile_source,
            tile_dir: args
                .tile_dir
                .clone()
                .or(file.tile_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TILE_DIR)),
            output_dir: args
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        })
    }
}

/// `--input` values as single layers followed by `--group` values as merged ones.
fn cli_inputs(args: &Args) -> HeatmapResult<Vec<InputGroup>> {
    let mut inputs: Vec<InputGroup> = args.inputs.iter().cloned().map(InputGroup::Single).collect();
    for group in &args.groups {
        let paths: Vec<PathBuf> = group
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();
        if paths.is_empty() {
            return Err(HeatmapError::invalid_option("group", format!("'{}' names no files", group)));
        }
        inputs.push(InputGroup::Merged(paths));
    }
    Ok(inputs)
}

fn cli_bbox(args: &Args) -> HeatmapResult<Option<GeoBoundingBox>> {
    let edges = [args.north, args.south, args.east, args.west];

    if let Some(text) = &args.bbox {
        if edges.iter().any(Option::is_some) {
            return Err(HeatmapError::invalid_option(
                "bbox",
                "use either --bbox or the individual edge flags, not both",
            ));
        }
        return text.parse().map(Some);
    }

    match edges {
        [None, None, None, None] => Ok(None),
        [Some(n), Some(s), Some(e), Some(w)] => GeoBoundingBox::new(n, s, e, w).map(Some),
        _ => Err(HeatmapError::invalid_option(
            "bbox",
            "--north, --south, --east and --west must be given together",
        )),
    }
}
