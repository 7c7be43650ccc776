//! Tile style selection.

use std::fmt;
use std::str::FromStr;

use heatmap_common::HeatmapError;

/// Tile style; each maps to a subdirectory of the tile root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileSource {
    #[default]
    CartoLightNoLabels,
    CartoLight,
    CartoDark,
    CartoDarkNoLabels,
    StamenToner,
    StamenTerrain,
    OpenStreetMap,
}

impl TileSource {
    pub const ALL: [TileSource; 7] = [
        TileSource::CartoLightNoLabels,
        TileSource::CartoLight,
        TileSource::CartoDark,
        TileSource::CartoDarkNoLabels,
        TileSource::StamenToner,
        TileSource::StamenTerrain,
        TileSource::OpenStreetMap,
    ];

    /// Directory name under the tile root.
    pub fn slug(&self) -> &'static str {
        match self {
            TileSource::CartoLightNoLabels => "carto-light-no-labels",
            TileSource::CartoLight => "carto-light",
            TileSource::CartoDark => "carto-dark",
            TileSource::CartoDarkNoLabels => "carto-dark-no-labels",
            TileSource::StamenToner => "stamen-toner",
            TileSource::StamenTerrain => "stamen-terrain",
            TileSource::OpenStreetMap => "osm",
        }
    }
}

impl fmt::Display for TileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TileSource {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        TileSource::ALL
            .into_iter()
            .find(|source| source.slug() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = TileSource::ALL.iter().map(|s| s.slug()).collect();
                HeatmapError::invalid_option(
                    "tile-source",
                    format!("unknown tile source '{}' (expected one of: {})", s, known.join(", ")),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for source in TileSource::ALL {
            assert_eq!(source.slug().parse::<TileSource>().unwrap(), source);
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_underscores() {
        assert_eq!("Carto_Dark".parse::<TileSource>().unwrap(), TileSource::CartoDark);
        assert_eq!(TileSource::default().to_string(), "carto-light-no-labels");
        assert!("bing".parse::<TileSource>().is_err());
    }
}
