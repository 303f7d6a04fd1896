//! Integer RGB color with distance helpers and `palette` interop.

use palette::Srgb;
use serde::{Deserialize, Serialize};

/// A color with three 0–255 integer channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    /// Create a color from its channel values
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel value by index: 0 = red, 1 = green, 2 = blue.
    ///
    /// Used by median-cut when sorting samples along a chosen axis.
    pub fn channel(&self, index: usize) -> u8 {
        match index {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    /// Squared Euclidean distance in RGB space
    pub fn distance_squared(&self, other: &RgbColor) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        dr * dr + dg * dg + db * db
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, other: &RgbColor) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Hexadecimal representation for display (`#rrggbb`)
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<RgbColor> for Srgb<u8> {
    fn from(color: RgbColor) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

impl From<Srgb<u8>> for RgbColor {
    fn from(srgb: Srgb<u8>) -> Self {
        RgbColor::new(srgb.red, srgb.green, srgb.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_RGB_DISTANCE;

    #[test]
    fn test_distance_symmetric() {
        let a = RgbColor::new(10, 20, 30);
        let b = RgbColor::new(200, 100, 50);
        assert_eq!(a.distance(&b), b.distance(&a));
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_black_white_is_max_distance() {
        let black = RgbColor::new(0, 0, 0);
        let white = RgbColor::new(255, 255, 255);
        assert!((black.distance(&white) - MAX_RGB_DISTANCE).abs() < 1e-9);
    }

    #[test]
    fn test_channel_indexing() {
        let c = RgbColor::new(1, 2, 3);
        assert_eq!(c.channel(0), 1);
        assert_eq!(c.channel(1), 2);
        assert_eq!(c.channel(2), 3);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(RgbColor::new(255, 0, 10).to_hex(), "#ff000a");
    }

    #[test]
    fn test_srgb_round_trip() {
        let c = RgbColor::new(12, 200, 99);
        let srgb: Srgb<u8> = c.into();
        assert_eq!(RgbColor::from(srgb), c);
    }
}
