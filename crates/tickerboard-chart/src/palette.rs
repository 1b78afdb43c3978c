use serde::Serialize;
use std::fmt;

/// Hue step between consecutive symbols, in degrees.
pub const GOLDEN_ANGLE: f64 = 137.5;

/// Extra hue rotation separating a symbol's volume line from its price line.
pub const VOLUME_HUE_OFFSET: f64 = 60.0;

pub const SATURATION: f64 = 70.0;
pub const LIGHTNESS: f64 = 50.0;
pub const FILL_ALPHA: f64 = 0.5;

/// Line color of a dataset, as HSL with saturation and lightness in percent.
///
/// Depends on nothing but the symbol's position in the tracked list, so a
/// rebuilt chart always colors the same position the same way.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SeriesColor {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl SeriesColor {
    pub fn price(index: usize) -> Self {
        Self::from_hue(index as f64 * GOLDEN_ANGLE)
    }

    pub fn volume(index: usize) -> Self {
        Self::from_hue(index as f64 * GOLDEN_ANGLE + VOLUME_HUE_OFFSET)
    }

    fn from_hue(hue: f64) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            saturation: SATURATION,
            lightness: LIGHTNESS,
        }
    }

    /// CSS color for the line itself.
    pub fn border(&self) -> String {
        self.to_string()
    }

    /// CSS color for the translucent fill under the line.
    pub fn background(&self) -> String {
        format!(
            "hsla({}, {}%, {}%, {FILL_ALPHA})",
            self.hue, self.saturation, self.lightness
        )
    }
}

impl fmt::Display for SeriesColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Plain RGBA color used for theme chrome (text, grid, tooltips).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
