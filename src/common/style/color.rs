//! RGB color type used by template profiles.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// RGB color representation.
///
/// Profiles spell colors as hex strings (`"#0B63B8"`); DrawingML wants the
/// six digits without the hash in `a:srgbClr/@val`.
///
/// # Examples
///
/// ```rust
/// use longan::common::RGBColor;
///
/// let blue = RGBColor::from_hex("#0B63B8").unwrap();
/// assert_eq!(blue.to_hex(), "0B63B8");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an RGB color from a hex string, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b))
    }

    /// Convert to hex string (without # prefix).
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl Serialize for RGBColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RGBColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        RGBColor::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color '{}'", hex)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(RGBColor::from_hex("#34568B"), Some(RGBColor::new(0x34, 0x56, 0x8B)));
        assert_eq!(RGBColor::from_hex("000000"), Some(RGBColor::new(0, 0, 0)));
        assert_eq!(RGBColor::from_hex("#12345"), None);
        assert_eq!(RGBColor::from_hex("zzzzzz"), None);
    }

    #[test]
    fn test_display_round_trip() {
        let color = RGBColor::new(0x1F, 0x3A, 0x93);
        assert_eq!(color.to_string(), "#1F3A93");
        assert_eq!(RGBColor::from_hex(&color.to_string()), Some(color));
    }
}
