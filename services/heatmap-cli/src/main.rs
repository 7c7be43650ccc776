//! `geo-heatmap`: render location-history density heatmaps.
//!
//! Reads one or more location-history exports, renders one density layer per
//! input (or per merged group) over a tile basemap and writes the result to the
//! next free `map_N.png` in the output directory.

use anyhow::{Context, Result};
use basemap::{Basemap, PlainBasemap, TileDirectoryBasemap};
use clap::Parser;
use ingestion::LocationHistoryLoader;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use heatmap_cli::{render, Args, MapConfig, OutputDir, RunSettings};

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level, args.json_logs)?;

    let file_config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading map configuration");
            Some(MapConfig::from_file(path)?)
        }
        None => None,
    };
    let settings = RunSettings::resolve(&args, file_config)?;

    info!(
        layers = settings.request.inputs.len(),
        tile_source = settings
            .tile_source
            .map(|s| s.slug())
            .unwrap_or(heatmap_cli::cli::NO_TILES),
        tile_dir = %settings.tile_dir.display(),
        output_dir = %settings.output_dir.display(),
        "Starting geo-heatmap"
    );

    let output = OutputDir::create(&settings.output_dir)?;
    let basemap: Box<dyn Basemap> = match settings.tile_source {
        Some(source) => Box::new(TileDirectoryBasemap::new(&settings.tile_dir, source)),
        None => Box::new(PlainBasemap::transparent()),
    };

    let path = render(&settings.request, basemap.as_ref(), &LocationHistoryLoader, &output)
        .context("Failed to render heatmap")?;

    println!("{}", path.display());
    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
