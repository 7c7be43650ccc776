//! Named color palettes and per-layer color resolution.
//!
//! Palettes are continuous ramps defined by color stops and linearly
//! interpolated between them. Lookup is case-insensitive and a `_r` suffix
//! reverses a ramp, so `Blues_r` runs from dark to light.

use heatmap_common::{ColorSpec, HeatmapError, HeatmapResult, Rgba};

/// A continuous color ramp indexed by a value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    name: &'static str,
    stops: &'static [(f64, Rgba)],
    reversed: bool,
}

impl Palette {
    /// Look up a palette by name.
    pub fn by_name(name: &str) -> HeatmapResult<Palette> {
        let lower = name.trim().to_lowercase();
        let (base, reversed) = match lower.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (lower.as_str(), false),
        };

        PALETTES
            .iter()
            .find(|(n, _)| *n == base)
            .map(|&(name, stops)| Palette {
                name,
                stops,
                reversed,
            })
            .ok_or_else(|| HeatmapError::UnknownPalette(name.to_string()))
    }

    /// Names of every built-in palette.
    pub fn available() -> impl Iterator<Item = &'static str> {
        PALETTES.iter().map(|(name, _)| *name)
    }

    pub fn name(&self) -> String {
        if self.reversed {
            format!("{}_r", self.name)
        } else {
            self.name.to_string()
        }
    }

    /// Color at position `t`; values outside [0, 1] clamp to the ends and NaN
    /// maps to the low end.
    pub fn sample(&self, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };

        let stops = self.stops;
        for pair in stops.windows(2) {
            let (lo_pos, lo) = pair[0];
            let (hi_pos, hi) = pair[1];
            if t <= hi_pos {
                let span = hi_pos - lo_pos;
                let local = if span > 0.0 { (t - lo_pos) / span } else { 0.0 };
                return lo.lerp(&hi, local);
            }
        }
        stops[stops.len() - 1].1
    }
}

/// Concrete coloring of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerColor {
    /// Shade each cell through a palette.
    Palette(Palette),
    /// Every cell with data gets this RGB; only alpha varies.
    Fixed(Rgba),
}

impl LayerColor {
    /// RGB for a cell with the given smoothed value. Alpha is assigned later.
    pub fn shade(&self, value: f64) -> Rgba {
        match self {
            LayerColor::Palette(palette) => palette.sample(value),
            LayerColor::Fixed(color) => *color,
        }
    }
}

/// Resolve a user color specification into one color per layer.
///
/// A top-level palette name is sampled evenly across the layers (the first
/// layer at 0, the last at 1) so that each layer gets its own fixed color.
/// Fails before any rendering if a per-layer list has the wrong length,
/// nests another list, or names an unknown palette.
pub fn resolve_layer_colors(spec: &ColorSpec, layer_count: usize) -> HeatmapResult<Vec<LayerColor>> {
    match spec {
        ColorSpec::PerLayer(entries) => {
            if entries.len() != layer_count {
                return Err(HeatmapError::ColorCountMismatch {
                    expected: layer_count,
                    actual: entries.len(),
                });
            }
            entries
                .iter()
                .map(|entry| match entry {
                    ColorSpec::Named(name) => Palette::by_name(name).map(LayerColor::Palette),
                    ColorSpec::Fixed(color) => Ok(LayerColor::Fixed(*color)),
                    ColorSpec::PerLayer(_) => Err(HeatmapError::InvalidColorSpec(
                        "per-layer color lists cannot be nested".to_string(),
                    )),
                })
                .collect()
        }
        ColorSpec::Fixed(color) => Ok(vec![LayerColor::Fixed(*color); layer_count]),
        ColorSpec::Named(name) => {
            let palette = Palette::by_name(name)?;
            let denominator = layer_count.saturating_sub(1).max(1) as f64;
            Ok((0..layer_count)
                .map(|i| LayerColor::Fixed(palette.sample(i as f64 / denominator)))
                .collect())
        }
    }
}

const PALETTES: &[(&str, &[(f64, Rgba)])] = &[
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("inferno", INFERNO),
    ("magma", MAGMA),
    ("cividis", CIVIDIS),
    ("turbo", TURBO),
    ("jet", JET),
    ("hot", HOT),
    ("greys", GREYS),
    ("reds", REDS),
    ("blues", BLUES),
    ("greens", GREENS),
    ("oranges", ORANGES),
    ("purples", PURPLES),
    ("coolwarm", COOLWARM),
];

// Blue -> Cyan -> Yellow -> Red
const JET: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(0, 0, 128)),
    (0.125, Rgba::opaque(0, 0, 255)),
    (0.375, Rgba::opaque(0, 255, 255)),
    (0.625, Rgba::opaque(255, 255, 0)),
    (0.875, Rgba::opaque(255, 0, 0)),
    (1.000, Rgba::opaque(128, 0, 0)),
];

// Black -> Red -> Yellow -> White
const HOT: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(11, 0, 0)),
    (0.365, Rgba::opaque(255, 0, 0)),
    (0.746, Rgba::opaque(255, 255, 0)),
    (1.000, Rgba::opaque(255, 255, 255)),
];

const VIRIDIS: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(68, 1, 84)),
    (0.125, Rgba::opaque(71, 45, 123)),
    (0.250, Rgba::opaque(59, 82, 139)),
    (0.375, Rgba::opaque(44, 114, 142)),
    (0.500, Rgba::opaque(33, 145, 140)),
    (0.625, Rgba::opaque(40, 174, 128)),
    (0.750, Rgba::opaque(94, 201, 98)),
    (0.875, Rgba::opaque(173, 220, 48)),
    (1.000, Rgba::opaque(253, 231, 37)),
];

const PLASMA: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(13, 8, 135)),
    (0.125, Rgba::opaque(76, 2, 161)),
    (0.250, Rgba::opaque(126, 3, 168)),
    (0.375, Rgba::opaque(169, 35, 149)),
    (0.500, Rgba::opaque(204, 71, 120)),
    (0.625, Rgba::opaque(229, 107, 93)),
    (0.750, Rgba::opaque(248, 149, 64)),
    (0.875, Rgba::opaque(253, 197, 39)),
    (1.000, Rgba::opaque(240, 249, 33)),
];

const INFERNO: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(0, 0, 4)),
    (0.125, Rgba::opaque(31, 12, 72)),
    (0.250, Rgba::opaque(85, 15, 109)),
    (0.375, Rgba::opaque(136, 34, 106)),
    (0.500, Rgba::opaque(186, 54, 85)),
    (0.625, Rgba::opaque(227, 89, 51)),
    (0.750, Rgba::opaque(249, 142, 9)),
    (0.875, Rgba::opaque(248, 201, 50)),
    (1.000, Rgba::opaque(252, 255, 164)),
];

const MAGMA: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(0, 0, 4)),
    (0.125, Rgba::opaque(28, 16, 68)),
    (0.250, Rgba::opaque(79, 18, 123)),
    (0.375, Rgba::opaque(129, 37, 129)),
    (0.500, Rgba::opaque(181, 54, 122)),
    (0.625, Rgba::opaque(229, 89, 100)),
    (0.750, Rgba::opaque(251, 135, 97)),
    (0.875, Rgba::opaque(254, 194, 135)),
    (1.000, Rgba::opaque(252, 253, 191)),
];

const CIVIDIS: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(0, 34, 78)),
    (0.125, Rgba::opaque(18, 53, 112)),
    (0.250, Rgba::opaque(59, 73, 108)),
    (0.375, Rgba::opaque(87, 93, 109)),
    (0.500, Rgba::opaque(112, 113, 115)),
    (0.625, Rgba::opaque(138, 134, 120)),
    (0.750, Rgba::opaque(165, 156, 116)),
    (0.875, Rgba::opaque(195, 179, 105)),
    (1.000, Rgba::opaque(254, 232, 56)),
];

const TURBO: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(48, 18, 59)),
    (0.143, Rgba::opaque(70, 117, 237)),
    (0.286, Rgba::opaque(27, 207, 212)),
    (0.429, Rgba::opaque(97, 252, 108)),
    (0.571, Rgba::opaque(209, 232, 52)),
    (0.714, Rgba::opaque(254, 155, 45)),
    (0.857, Rgba::opaque(217, 56, 6)),
    (1.000, Rgba::opaque(122, 4, 3)),
];

const GREYS: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(255, 255, 255)),
    (0.125, Rgba::opaque(240, 240, 240)),
    (0.250, Rgba::opaque(217, 217, 217)),
    (0.375, Rgba::opaque(189, 189, 189)),
    (0.500, Rgba::opaque(150, 150, 150)),
    (0.625, Rgba::opaque(115, 115, 115)),
    (0.750, Rgba::opaque(82, 82, 82)),
    (0.875, Rgba::opaque(37, 37, 37)),
    (1.000, Rgba::opaque(0, 0, 0)),
];

const REDS: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(255, 245, 240)),
    (0.125, Rgba::opaque(254, 224, 210)),
    (0.250, Rgba::opaque(252, 187, 161)),
    (0.375, Rgba::opaque(252, 146, 114)),
    (0.500, Rgba::opaque(251, 106, 74)),
    (0.625, Rgba::opaque(239, 59, 44)),
    (0.750, Rgba::opaque(203, 24, 29)),
    (0.875, Rgba::opaque(165, 15, 21)),
    (1.000, Rgba::opaque(103, 0, 13)),
];

const BLUES: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(247, 251, 255)),
    (0.125, Rgba::opaque(222, 235, 247)),
    (0.250, Rgba::opaque(198, 219, 239)),
    (0.375, Rgba::opaque(158, 202, 225)),
    (0.500, Rgba::opaque(107, 174, 214)),
    (0.625, Rgba::opaque(66, 146, 198)),
    (0.750, Rgba::opaque(33, 113, 181)),
    (0.875, Rgba::opaque(8, 81, 156)),
    (1.000, Rgba::opaque(8, 48, 107)),
];

const GREENS: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(247, 252, 245)),
    (0.125, Rgba::opaque(229, 245, 224)),
    (0.250, Rgba::opaque(199, 233, 192)),
    (0.375, Rgba::opaque(161, 217, 155)),
    (0.500, Rgba::opaque(116, 196, 118)),
    (0.625, Rgba::opaque(65, 171, 93)),
    (0.750, Rgba::opaque(35, 139, 69)),
    (0.875, Rgba::opaque(0, 109, 44)),
    (1.000, Rgba::opaque(0, 68, 27)),
];

const ORANGES: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(255, 245, 235)),
    (0.125, Rgba::opaque(254, 230, 206)),
    (0.250, Rgba::opaque(253, 208, 162)),
    (0.375, Rgba::opaque(253, 174, 107)),
    (0.500, Rgba::opaque(253, 141, 60)),
    (0.625, Rgba::opaque(241, 105, 19)),
    (0.750, Rgba::opaque(217, 72, 1)),
    (0.875, Rgba::opaque(166, 54, 3)),
    (1.000, Rgba::opaque(127, 39, 4)),
];

const PURPLES: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(252, 251, 253)),
    (0.125, Rgba::opaque(239, 237, 245)),
    (0.250, Rgba::opaque(218, 218, 235)),
    (0.375, Rgba::opaque(188, 189, 220)),
    (0.500, Rgba::opaque(158, 154, 200)),
    (0.625, Rgba::opaque(128, 125, 186)),
    (0.750, Rgba::opaque(106, 81, 163)),
    (0.875, Rgba::opaque(84, 39, 143)),
    (1.000, Rgba::opaque(63, 0, 125)),
];

const COOLWARM: &[(f64, Rgba)] = &[
    (0.000, Rgba::opaque(59, 76, 192)),
    (0.143, Rgba::opaque(103, 136, 238)),
    (0.286, Rgba::opaque(154, 187, 255)),
    (0.429, Rgba::opaque(201, 215, 240)),
    (0.571, Rgba::opaque(237, 209, 194)),
    (0.714, Rgba::opaque(247, 168, 137)),
    (0.857, Rgba::opaque(226, 105, 82)),
    (1.000, Rgba::opaque(180, 4, 38)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        assert!(Palette::by_name("Viridis").is_ok());
        assert!(Palette::by_name("BLUES").is_ok());
        assert!(matches!(
            Palette::by_name("rainbow-unicorn"),
            Err(HeatmapError::UnknownPalette(_))
        ));
    }

    #[test]
    fn test_endpoints() {
        let viridis = Palette::by_name("viridis").unwrap();
        assert_eq!(viridis.sample(0.0), Rgba::opaque(68, 1, 84));
        assert_eq!(viridis.sample(1.0), Rgba::opaque(253, 231, 37));
        assert_eq!(viridis.sample(7.5), viridis.sample(1.0));
        assert_eq!(viridis.sample(-1.0), viridis.sample(0.0));
        assert_eq!(viridis.sample(f64::NAN), viridis.sample(0.0));
    }

    #[test]
    fn test_reversed() {
        let blues = Palette::by_name("blues").unwrap();
        let blues_r = Palette::by_name("Blues_r").unwrap();
        assert_eq!(blues_r.name(), "blues_r");
        assert_eq!(blues.sample(0.25), blues_r.sample(0.75));
    }

    #[test]
    fn test_every_palette_is_well_formed() {
        for name in Palette::available() {
            let palette = Palette::by_name(name).unwrap();
            assert!(palette.stops.len() >= 2, "{} has too few stops", name);
            assert_eq!(palette.stops[0].0, 0.0, "{} must start at 0", name);
            assert_eq!(palette.stops[palette.stops.len() - 1].0, 1.0, "{} must end at 1", name);
            assert!(
                palette.stops.windows(2).all(|w| w[0].0 < w[1].0),
                "{} stops must ascend",
                name
            );
        }
    }
}
