//! Token color palette

use serde::{Serialize, Serializer};
use std::fmt;

/// 24-bit color; displays and serializes as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// From a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Background and text color for one token chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorPair {
    pub background: Rgb,
    pub foreground: Rgb,
}

impl ColorPair {
    const fn new(background: u32, foreground: u32) -> Self {
        Self {
            background: Rgb::from_hex(background),
            foreground: Rgb::from_hex(foreground),
        }
    }
}

/// Light backgrounds (Material 50) paired with dark text (Material 900)
pub const PALETTE: [ColorPair; 10] = [
    ColorPair::new(0xFFF8E1, 0xF57F17), // Amber
    ColorPair::new(0xE3F2FD, 0x0D47A1), // Blue
    ColorPair::new(0xF3E5F5, 0x4A148C), // Purple
    ColorPair::new(0xE8F5E9, 0x1B5E20), // Green
    ColorPair::new(0xFFEBEE, 0xB71C1C), // Red
    ColorPair::new(0xE0F7FA, 0x006064), // Cyan
    ColorPair::new(0xFFF3E0, 0xE65100), // Orange
    ColorPair::new(0xF1F8E9, 0x33691E), // Light Green
    ColorPair::new(0xE8EAF6, 0x1A237E), // Indigo
    ColorPair::new(0xFCE4EC, 0x880E4F), // Pink
];

/// Colors for the token at `index`; depends on position only
pub fn color_for(index: usize) -> ColorPair {
    PALETTE[index % PALETTE.len()]
}
