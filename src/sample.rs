use crate::error::{OverlayError, Result};
use nalgebra::Vector2;

/// Position in surface space, device pixels.
pub type Point = Vector2<f64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 0xff }
    }

    /// Parses `#rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || OverlayError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).map_err(|_| invalid());
        Ok(Rgba::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Trail colors as written in the page stylesheet.
pub const PALETTE_HEX: [&str; 2] = ["#00d8ff", "#0099cc"];

pub const DEFAULT_PALETTE: [Rgba; 2] = [Rgba::rgb(0x00, 0xd8, 0xff), Rgba::rgb(0x00, 0x99, 0xcc)];

/// Palette entry for the sample at `index`. The palette must not be empty.
pub fn color_for(index: usize, palette: &[Rgba]) -> Rgba {
    palette[index % palette.len()]
}

/// One point of the trail. The color is fixed when the sample is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub position: Point,
    color: Rgba,
}

impl Sample {
    pub fn new(position: Point, color: Rgba) -> Self {
        Sample { position, color }
    }

    pub fn color(&self) -> Rgba {
        self.color
    }
}
