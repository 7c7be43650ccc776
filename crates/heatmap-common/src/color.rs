//! Colors and per-layer color specifications.
//!
//! A [`ColorSpec`] is what the user asks for; it is resolved into one concrete
//! color mapping per layer before any rendering starts.

use serde::{Deserialize, Serialize};

use crate::{HeatmapError, HeatmapResult};

/// 8-bit RGBA color, straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Build from unit-interval components, as in `(0.5, 0.0, 1.0, 1.0)`.
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> HeatmapResult<Self> {
        let channel = |v: f64| -> HeatmapResult<u8> {
            if !(0.0..=1.0).contains(&v) {
                return Err(HeatmapError::InvalidColorSpec(format!(
                    "color component {} is outside [0, 1]",
                    v
                )));
            }
            Ok((v * 255.0).round() as u8)
        };
        Ok(Self::new(channel(r)?, channel(g)?, channel(b)?, channel(a)?))
    }

    /// Parse "#RRGGBB" or "#RRGGBBAA".
    pub fn from_hex(s: &str) -> HeatmapResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HeatmapError::InvalidColorSpec(format!(
                "'{}' is not a #RRGGBB or #RRGGBBAA color",
                s
            )));
        }

        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| {
                HeatmapError::InvalidColorSpec(format!("'{}' has invalid hex digits", s))
            })
        };

        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// A small set of plain color names.
    pub fn named(name: &str) -> Option<Self> {
        let rgba = match name.to_lowercase().as_str() {
            "black" => Rgba::opaque(0, 0, 0),
            "white" => Rgba::opaque(255, 255, 255),
            "red" => Rgba::opaque(255, 0, 0),
            "green" => Rgba::opaque(0, 128, 0),
            "blue" => Rgba::opaque(0, 0, 255),
            "yellow" => Rgba::opaque(255, 255, 0),
            "cyan" => Rgba::opaque(0, 255, 255),
            "magenta" => Rgba::opaque(255, 0, 255),
            "orange" => Rgba::opaque(255, 165, 0),
            "purple" => Rgba::opaque(128, 0, 128),
            "gray" | "grey" => Rgba::opaque(128, 128, 128),
            _ => return None,
        };
        Some(rgba)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation, `t` clamped to [0, 1].
    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8;
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

/// Requested coloring of the layers of a run.
///
/// - `Named`: a palette name. At the top level the palette is sampled across
///   layers to give each layer its own fixed color; inside `PerLayer` the
///   layer is shaded through the palette.
/// - `Fixed`: one color, only alpha varies with density.
/// - `PerLayer`: one entry per layer, each `Named` or `Fixed`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawColorSpec")]
pub enum ColorSpec {
    Named(String),
    Fixed(Rgba),
    PerLayer(Vec<ColorSpec>),
}

impl ColorSpec {
    /// Parse a single command-line color argument.
    ///
    /// Hex strings, `r,g,b[,a]` unit tuples and plain color names become
    /// `Fixed`; anything else is taken as a palette name.
    pub fn parse(s: &str) -> HeatmapResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(HeatmapError::InvalidColorSpec("empty color".to_string()));
        }
        if s.starts_with('#') {
            return Ok(ColorSpec::Fixed(Rgba::from_hex(s)?));
        }
        if s.contains(',') {
            let parts = s
                .split(',')
                .map(|p| {
                    p.trim().parse::<f64>().map_err(|_| {
                        HeatmapError::InvalidColorSpec(format!("invalid component '{}' in '{}'", p, s))
                    })
                })
                .collect::<HeatmapResult<Vec<f64>>>()?;
            return Self::from_components(&parts).map(ColorSpec::Fixed);
        }
        if let Some(rgba) = Rgba::named(s) {
            return Ok(ColorSpec::Fixed(rgba));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(HeatmapError::InvalidColorSpec(format!(
                "'{}' is neither a color nor a palette name",
                s
            )));
        }
        Ok(ColorSpec::Named(s.to_string()))
    }

    /// Build a spec from repeated command-line values: one value describes
    /// every layer, several values are a per-layer list.
    pub fn from_args<S: AsRef<str>>(values: &[S]) -> HeatmapResult<Self> {
        match values {
            [] => Err(HeatmapError::InvalidColorSpec(
                "no color given".to_string(),
            )),
            [single] => Self::parse(single.as_ref()),
            many => many
                .iter()
                .map(|v| Self::parse(v.as_ref()))
                .collect::<HeatmapResult<Vec<_>>>()
                .map(ColorSpec::PerLayer),
        }
    }

    fn from_components(parts: &[f64]) -> HeatmapResult<Rgba> {
        match *parts {
            [r, g, b] => Rgba::from_unit(r, g, b, 1.0),
            [r, g, b, a] => Rgba::from_unit(r, g, b, a),
            _ => Err(HeatmapError::InvalidColorSpec(format!(
                "expected 3 or 4 color components, got {}",
                parts.len()
            ))),
        }
    }
}

/// Untyped shape accepted from configuration files.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawColorSpec {
    Text(String),
    Components(Vec<f64>),
    List(Vec<RawColorSpec>),
}

impl TryFrom<RawColorSpec> for ColorSpec {
    type Error = HeatmapError;

    fn try_from(raw: RawColorSpec) -> Result<Self, Self::Error> {
        match raw {
            RawColorSpec::Text(s) => ColorSpec::parse(&s),
            RawColorSpec::Components(parts) => ColorSpec::from_components(&parts).map(ColorSpec::Fixed),
            RawColorSpec::List(items) => items
                .into_iter()
                .map(ColorSpec::try_from)
                .collect::<HeatmapResult<Vec<_>>>()
                .map(ColorSpec::PerLayer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(Rgba::from_hex("#ff0000").unwrap(), Rgba::opaque(255, 0, 0));
        assert_eq!(
            Rgba::from_hex("#0000ff80").unwrap(),
            Rgba::new(0, 0, 255, 128)
        );
        assert!(Rgba::from_hex("#ff00").is_err());
        assert!(Rgba::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_hex_rejects_malformed_prefixes() {
        assert!(Rgba::from_hex("##ff0000").is_err());
        assert!(Rgba::from_hex("#+f0000").is_err());
        assert!(Rgba::from_hex("#ff00-0").is_err());
        assert!(ColorSpec::parse("##ff0000").is_err());
    }

    #[test]
    fn test_lerp() {
        let black = Rgba::opaque(0, 0, 0);
        let white = Rgba::WHITE;
        assert_eq!(black.lerp(&white, 0.5), Rgba::opaque(128, 128, 128));
        assert_eq!(black.lerp(&white, 2.0), white);
    }

    #[test]
    fn test_parse_kinds() {
        assert_eq!(
            ColorSpec::parse("#00ff00").unwrap(),
            ColorSpec::Fixed(Rgba::opaque(0, 255, 0))
        );
        assert_eq!(
            ColorSpec::parse("1.0, 0.0, 0.0, 0.5").unwrap(),
            ColorSpec::Fixed(Rgba::new(255, 0, 0, 128))
        );
        assert_eq!(
            ColorSpec::parse("blue").unwrap(),
            ColorSpec::Fixed(Rgba::opaque(0, 0, 255))
        );
        assert_eq!(
            ColorSpec::parse("viridis").unwrap(),
            ColorSpec::Named("viridis".to_string())
        );
        assert!(ColorSpec::parse("1.0,2.0,0.0").is_err());
        assert!(ColorSpec::parse("not a palette!").is_err());
    }

    #[test]
    fn test_from_args() {
        assert_eq!(
            ColorSpec::from_args(&["plasma"]).unwrap(),
            ColorSpec::Named("plasma".to_string())
        );
        assert_eq!(
            ColorSpec::from_args(&["#ff0000", "magma"]).unwrap(),
            ColorSpec::PerLayer(vec![
                ColorSpec::Fixed(Rgba::opaque(255, 0, 0)),
                ColorSpec::Named("magma".to_string()),
            ])
        );
        assert!(ColorSpec::from_args::<&str>(&[]).is_err());
    }
}
