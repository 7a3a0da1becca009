//! Module colors for rendered QR codes

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named colors accepted in configuration and on the command line.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("orange", [255, 165, 0]),
    ("brown", [165, 42, 42]),
    ("pink", [255, 192, 203]),
];

/// An opaque RGB color.
///
/// Parses from a color name (`blue`) or a hex literal (`#00f`, `#0000ff`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QrColor([u8; 3]);

impl QrColor {
    /// Pure black
    pub const BLACK: QrColor = QrColor([0, 0, 0]);
    /// Pure white
    pub const WHITE: QrColor = QrColor([255, 255, 255]);

    /// Build a color from its red, green and blue channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// The raw channels.
    pub fn channels(&self) -> [u8; 3] {
        self.0
    }

    /// Pixel value for the `image` crate.
    pub fn to_pixel(self) -> Rgb<u8> {
        Rgb(self.0)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, digit) in out.iter_mut().zip(hex.chars()) {
                    let value = digit.to_digit(16)? as u8;
                    *slot = value * 17;
                }
                Some(Self(out))
            }
            6 => {
                let mut out = [0u8; 3];
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
                }
                Some(Self(out))
            }
            _ => None,
        }
    }
}

impl Default for QrColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for QrColor {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = value.trim();

        let parsed = match trimmed.strip_prefix('#') {
            Some(hex) => Self::parse_hex(hex),
            None => {
                let lower = trimmed.to_ascii_lowercase();
                NAMED_COLORS
                    .iter()
                    .find(|(name, _)| *name == lower)
                    .map(|(_, rgb)| Self(*rgb))
            }
        };

        parsed.ok_or_else(|| {
            format!("Unknown color '{value}', expected a color name or #rrggbb hex value")
        })
    }
}

impl TryFrom<String> for QrColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QrColor> for String {
    fn from(color: QrColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for QrColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((name, _)) = NAMED_COLORS.iter().find(|(_, rgb)| *rgb == self.0) {
            return f.write_str(name);
        }
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Fill and background colors of a QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrColors {
    /// Color of the dark modules
    pub fill: QrColor,
    /// Color of the light modules and quiet zone
    pub back: QrColor,
}

impl QrColors {
    /// Pair a fill color with a background color.
    pub fn new(fill: QrColor, back: QrColor) -> Self {
        Self { fill, back }
    }
}

impl Default for QrColors {
    fn default() -> Self {
        Self {
            fill: QrColor::BLACK,
            back: QrColor::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("blue".parse::<QrColor>(), Ok(QrColor::rgb(0, 0, 255)));
        assert_eq!("Yellow".parse::<QrColor>(), Ok(QrColor::rgb(255, 255, 0)));
        assert_eq!(" WHITE ".parse::<QrColor>(), Ok(QrColor::WHITE));
    }

    #[test]
    fn parses_hex_literals() {
        assert_eq!("#ff8000".parse::<QrColor>(), Ok(QrColor::rgb(255, 128, 0)));
        assert_eq!("#0F0".parse::<QrColor>(), Ok(QrColor::rgb(0, 255, 0)));
    }

    #[test]
    fn rejects_unknown_colors() {
        assert!("blurple".parse::<QrColor>().is_err());
        assert!("#12345".parse::<QrColor>().is_err());
        assert!("#gggggg".parse::<QrColor>().is_err());
        assert!("".parse::<QrColor>().is_err());
    }

    #[test]
    fn rejects_signed_hex_pairs() {
        assert!("#+f+f+f".parse::<QrColor>().is_err());
        assert!("#-1-1-1".parse::<QrColor>().is_err());
        assert!("#ff+fff".parse::<QrColor>().is_err());
    }

    #[test]
    fn displays_name_when_known() {
        assert_eq!(QrColor::rgb(0, 0, 255).to_string(), "blue");
        assert_eq!(QrColor::rgb(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn default_colors_are_black_on_white() {
        let colors = QrColors::default();
        assert_eq!(colors.fill, QrColor::BLACK);
        assert_eq!(colors.back, QrColor::WHITE);
    }
}
