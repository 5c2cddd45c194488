//! Visual style attributes of an area.

use std::fmt;

/// An opaque RGB color packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xffffff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parses `#rrggbb` or `rrggbb`. Returns None for anything else.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Visual style of an area as reported by the renderer.
///
/// `font_weight` and `font_style` are normalized to `[0, 1]`
/// (1.0 = bold / italic).
#[derive(Debug, Clone, PartialEq)]
pub struct AreaStyle {
    pub font_size: f64,
    pub font_weight: f64,
    pub font_style: f64,
    pub color: Color,
    pub background: Option<Color>,
    /// Whether the area's background visually separates it from its parent.
    pub background_separated: bool,
}

impl Default for AreaStyle {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            font_weight: 0.0,
            font_style: 0.0,
            color: Color::BLACK,
            background: None,
            background_separated: false,
        }
    }
}

impl AreaStyle {
    pub fn new(font_size: f64, font_weight: f64, font_style: f64, color: Color) -> Self {
        Self {
            font_size,
            font_weight,
            font_style,
            color,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: Color, separated: bool) -> Self {
        self.background = Some(background);
        self.background_separated = separated;
        self
    }

    /// Composite emphasis used to compare heading candidates.
    pub fn markedness(&self) -> f64 {
        self.font_size * 10.0 + self.font_weight
    }
}
