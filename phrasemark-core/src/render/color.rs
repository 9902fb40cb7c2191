use crate::error::PhrasemarkError;
use std::fmt;
use std::str::FromStr;

/// Outline color.
///
/// Supports RGB and Grayscale with components from 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// RGB color (red, green, blue) with values from 0.0 to 1.0
    Rgb(f64, f64, f64),
    /// Grayscale color with value from 0.0 (black) to 1.0 (white)
    Gray(f64),
}

impl Color {
    /// Creates an RGB color with values clamped to 0.0-1.0.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Creates a grayscale color with value clamped to 0.0-1.0.
    pub fn gray(value: f64) -> Self {
        Color::Gray(value.clamp(0.0, 1.0))
    }

    /// Creates an RGB color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    pub fn white() -> Self {
        Color::Gray(1.0)
    }

    /// Red color (RGB 1,0,0), the default outline color.
    pub fn red() -> Self {
        Color::Rgb(1.0, 0.0, 0.0)
    }

    pub fn green() -> Self {
        Color::Rgb(0.0, 1.0, 0.0)
    }

    pub fn blue() -> Self {
        Color::Rgb(0.0, 0.0, 1.0)
    }

    pub fn yellow() -> Self {
        Color::Rgb(1.0, 1.0, 0.0)
    }

    pub fn magenta() -> Self {
        Color::Rgb(1.0, 0.0, 1.0)
    }

    /// 8-bit RGB channels for raster drawing
    pub fn to_rgb8(&self) -> [u8; 3] {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match *self {
            Color::Rgb(r, g, b) => [channel(r), channel(g), channel(b)],
            Color::Gray(v) => {
                let v = channel(v);
                [v, v, v]
            }
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::red()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb8();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Parses a color name (`red`, `blue`, ...) or a `#rrggbb` hex triplet
impl FromStr for Color {
    type Err = PhrasemarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let color = match name.as_str() {
            "red" => Color::red(),
            "green" => Color::green(),
            "blue" => Color::blue(),
            "yellow" => Color::yellow(),
            "magenta" => Color::magenta(),
            "black" => Color::black(),
            "white" => Color::white(),
            hex => parse_hex(hex)
                .ok_or_else(|| PhrasemarkError::InvalidArgument(format!("unknown color: {s}")))?,
        };
        Ok(color)
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_clamping() {
        assert_eq!(Color::rgb(1.5, -0.5, 0.5), Color::Rgb(1.0, 0.0, 0.5));
        assert_eq!(Color::gray(2.0), Color::Gray(1.0));
    }

    #[test]
    fn test_to_rgb8() {
        assert_eq!(Color::red().to_rgb8(), [255, 0, 0]);
        assert_eq!(Color::gray(0.5).to_rgb8(), [128, 128, 128]);
        assert_eq!(Color::black().to_rgb8(), [0, 0, 0]);
        assert_eq!(Color::from_rgb8(12, 34, 56).to_rgb8(), [12, 34, 56]);
    }

    #[test]
    fn test_default_is_red() {
        assert_eq!(Color::default(), Color::red());
    }

    #[test]
    fn test_parse_names_and_hex() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::red());
        assert_eq!(" Blue ".parse::<Color>().unwrap(), Color::blue());
        assert_eq!("#00ff00".parse::<Color>().unwrap().to_rgb8(), [0, 255, 0]);
        assert_eq!("#1A2b3C".parse::<Color>().unwrap().to_rgb8(), [0x1a, 0x2b, 0x3c]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "purple-ish", "#12345", "#gggggg", "123456"] {
            assert!(matches!(
                input.parse::<Color>(),
                Err(PhrasemarkError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_display_as_hex() {
        assert_eq!(Color::red().to_string(), "#ff0000");
        assert_eq!(Color::white().to_string(), "#ffffff");
    }
}
