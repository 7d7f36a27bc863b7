//! Chart styling
//!
//! Dark theme shared by all charts. Passed explicitly to renderers instead of
//! being installed as global state.

use crossterm::style::Color;
use serde::{Deserialize, Serialize};

use crate::core::{GexError, GexResult};

/// Chart style configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Figure / axes background
    pub background: String,
    /// Bar fill colour
    pub bar_color: String,
    /// Bar opacity against the background
    pub bar_alpha: f64,
    /// Grid line colour
    pub grid_color: String,
    /// Text grey level (0 = black, 1 = white)
    pub text_gray: f64,
    /// Bold ticks, labels and titles
    pub heavy_font: bool,
    /// Colormap name for the surface
    pub surface_colormap: String,
    /// Terminal width in columns
    pub width: usize,
    /// Emit ANSI colours
    pub color: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: "#212946".to_string(),
            bar_color: "#FE53BB".to_string(),
            bar_alpha: 0.5,
            grid_color: "#2A3459".to_string(),
            text_gray: 0.9,
            heavy_font: true,
            surface_colormap: "seismic_r".to_string(),
            width: 100,
            color: true,
        }
    }
}

impl ChartStyle {
    /// Bar colour blended over the background at `bar_alpha`
    pub fn bar_rgb(&self) -> GexResult<Rgb> {
        let bar = Rgb::from_hex(&self.bar_color)?;
        let background = Rgb::from_hex(&self.background)?;
        Ok(bar.blend(background, self.bar_alpha))
    }

    pub fn text_rgb(&self) -> Rgb {
        let level = (self.text_gray.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb(level, level, level)
    }

    /// Diverging colormap orientation: `seismic` runs blue→white→red,
    /// `seismic_r` red→white→blue
    pub fn colormap_reversed(&self) -> GexResult<bool> {
        match self.surface_colormap.as_str() {
            "seismic" => Ok(false),
            "seismic_r" => Ok(true),
            other => Err(GexError::config(format!("unsupported colormap '{}'", other))),
        }
    }

    /// Colour for a value in [-1, 1] on the diverging colormap
    pub fn diverging_rgb(&self, t: f64) -> GexResult<Rgb> {
        let t = if self.colormap_reversed()? { -t } else { t };
        let t = if t.is_finite() { t.clamp(-1.0, 1.0) } else { 0.0 };
        let white = Rgb(255, 255, 255);
        Ok(if t >= 0.0 {
            Rgb(255, 0, 0).blend(white, t)
        } else {
            Rgb(0, 0, 255).blend(white, -t)
        })
    }

    pub fn validate(&self) -> GexResult<()> {
        self.colormap_reversed()?;
        Rgb::from_hex(&self.background)?;
        Rgb::from_hex(&self.bar_color)?;
        Rgb::from_hex(&self.grid_color)?;
        if !(0.0..=1.0).contains(&self.bar_alpha) {
            return Err(GexError::config(format!("bar_alpha {} outside [0, 1]", self.bar_alpha)));
        }
        if self.width < 40 {
            return Err(GexError::config(format!("width {} too narrow (min 40)", self.width)));
        }
        Ok(())
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB`
    pub fn from_hex(hex: &str) -> GexResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(GexError::config(format!("invalid colour '{}'", hex)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| GexError::config(format!("invalid colour '{}'", hex)))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Alpha-composite `self` over `background`
    pub fn blend(self, background: Rgb, alpha: f64) -> Rgb {
        let mix = |fg: u8, bg: u8| (fg as f64 * alpha + bg as f64 * (1.0 - alpha)).round() as u8;
        Rgb(
            mix(self.0, background.0),
            mix(self.1, background.1),
            mix(self.2, background.2),
        )
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb {
            r: rgb.0,
            g: rgb.1,
            b: rgb.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#212946").unwrap(), Rgb(0x21, 0x29, 0x46));
        assert_eq!(Rgb::from_hex("FE53BB").unwrap(), Rgb(0xFE, 0x53, 0xBB));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(Color::from(Rgb(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn test_blend() {
        let white = Rgb(255, 255, 255);
        let black = Rgb(0, 0, 0);
        assert_eq!(white.blend(black, 0.5), Rgb(128, 128, 128));
        assert_eq!(white.blend(black, 1.0), white);
        assert_eq!(white.blend(black, 0.0), black);
    }

    #[test]
    fn test_default_style() {
        let style = ChartStyle::default();
        style.validate().unwrap();

        // #FE53BB at 0.5 over #212946
        assert_eq!(style.bar_rgb().unwrap(), Rgb(144, 62, 129));
        assert_eq!(style.text_rgb(), Rgb(230, 230, 230));
    }

    #[test]
    fn test_diverging_colormap() {
        let style = ChartStyle::default();
        // seismic_r: positive exposure is blue, negative red
        assert_eq!(style.diverging_rgb(1.0).unwrap(), Rgb(0, 0, 255));
        assert_eq!(style.diverging_rgb(-1.0).unwrap(), Rgb(255, 0, 0));
        assert_eq!(style.diverging_rgb(0.0).unwrap(), Rgb(255, 255, 255));

        let style = ChartStyle {
            surface_colormap: "seismic".to_string(),
            ..Default::default()
        };
        assert_eq!(style.diverging_rgb(2.0).unwrap(), Rgb(255, 0, 0));

        let style = ChartStyle {
            surface_colormap: "viridis".to_string(),
            ..Default::default()
        };
        assert!(style.diverging_rgb(0.5).is_err());
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_invalid_style() {
        let style = ChartStyle {
            bar_alpha: 1.5,
            ..Default::default()
        };
        assert!(style.validate().is_err());

        let style = ChartStyle {
            grid_color: "pink".to_string(),
            ..Default::default()
        };
        assert!(style.validate().is_err());
    }
}
