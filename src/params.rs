//! Render options, color parsing and download format validation.

use serde::{Deserialize, Serialize};

use crate::model::{SymbolKind, Symbology};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Black.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    /// White.
    pub const WHITE: Self = Self { r: 0xFF, g: 0xFF, b: 0xFF };

    /// Pixel value for an RGB raster.
    #[must_use]
    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_color(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    }
}

/// Parse a `#rgb` or `#rrggbb` hex color.
///
/// # Errors
///
/// Returns an error if the string is not a hex color.
pub fn parse_color(input: &str) -> Result<Color, String> {
    let err = || format!("Invalid color '{input}'. Expected #rgb or #rrggbb");
    let hex = input.trim().strip_prefix('#').ok_or_else(err)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(err());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            Ok(Color { r: expand(0)?, g: expand(1)?, b: expand(2)? })
        }
        6 => Ok(Color { r: channel(&hex[0..2])?, g: channel(&hex[2..4])?, b: channel(&hex[4..6])? }),
        _ => Err(err()),
    }
}

/// QR rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Edge length of the square image in pixels.
    pub size: u32,
    /// Dark module color.
    pub foreground: Color,
    /// Light module color.
    pub background: Color,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self { size: 200, foreground: Color::BLACK, background: Color::WHITE }
    }
}

impl QrOptions {
    /// Check that the size is in range.
    ///
    /// # Errors
    ///
    /// Returns the validator message for the first bad field.
    pub fn validate(&self) -> Result<(), String> {
        validate_qr_size(self.size)
    }
}

/// Barcode rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeOptions {
    /// Symbology to encode with.
    pub format: Symbology,
    /// Width of a single module in pixels.
    pub width: f32,
    /// Bar height in pixels.
    pub height: u32,
    /// Bar color.
    pub line_color: Color,
    /// Background and quiet-zone color.
    pub background: Color,
    /// Print the human-readable value under the bars.
    pub display_value: bool,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            format: Symbology::Code128,
            width: 2.0,
            height: 100,
            line_color: Color::BLACK,
            background: Color::WHITE,
            display_value: true,
        }
    }
}

impl BarcodeOptions {
    /// Check that the module width and bar height are in range.
    ///
    /// # Errors
    ///
    /// Returns the validator message for the first bad field.
    pub fn validate(&self) -> Result<(), String> {
        validate_bar_width(self.width)?;
        validate_bar_height(self.height)
    }
}

/// Options for one render call, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOptions {
    /// Options for a QR code.
    Qr(QrOptions),
    /// Options for a barcode.
    Barcode(BarcodeOptions),
}

impl RenderOptions {
    /// The symbol kind these options apply to.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Qr(_) => SymbolKind::Qr,
            Self::Barcode(_) => SymbolKind::Barcode,
        }
    }

    /// Range-check the options for either kind.
    ///
    /// # Errors
    ///
    /// Returns the validator message for the first bad field.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Qr(opts) => opts.validate(),
            Self::Barcode(opts) => opts.validate(),
        }
    }
}

/// Validate the QR size parameter.
///
/// # Errors
///
/// Returns an error if the size is zero or unreasonably large.
pub fn validate_qr_size(size: u32) -> Result<(), String> {
    if (1..=4096).contains(&size) {
        Ok(())
    } else {
        Err(format!("Unsupported QR size {size}. Valid: 1-4096 pixels"))
    }
}

/// Validate the barcode module width.
///
/// # Errors
///
/// Returns an error if the width is not a positive finite number.
pub fn validate_bar_width(width: f32) -> Result<(), String> {
    if width.is_finite() && width > 0.0 && width <= 16.0 {
        Ok(())
    } else {
        Err(format!("Unsupported bar width {width}. Valid: >0 and <=16"))
    }
}

/// Validate the barcode height.
///
/// # Errors
///
/// Returns an error if the height is zero or unreasonably large.
pub fn validate_bar_height(height: u32) -> Result<(), String> {
    if (1..=2048).contains(&height) {
        Ok(())
    } else {
        Err(format!("Unsupported bar height {height}. Valid: 1-2048 pixels"))
    }
}

/// Validate the download format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), String> {
    match format {
        "png" | "jpeg" | "webp" => Ok(()),
        _ => Err(format!("Unsupported format '{format}'. Valid: png, jpeg, webp")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_long_hex() {
        assert_eq!(parse_color("#ff8000").unwrap(), Color { r: 0xFF, g: 0x80, b: 0 });
        assert_eq!(parse_color("#FFFFFF").unwrap(), Color::WHITE);
    }

    #[test]
    fn parse_short_hex() {
        assert_eq!(parse_color("#f00").unwrap(), Color { r: 0xFF, g: 0, b: 0 });
        assert_eq!(parse_color("#000").unwrap(), Color::BLACK);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_color("red").is_err());
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gg0000").is_err());
        assert!(parse_color("#").is_err());
    }

    #[test]
    fn color_serializes_as_hex() {
        let json = serde_json::to_string(&Color { r: 1, g: 2, b: 255 }).unwrap();
        assert_eq!(json, "\"#0102ff\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color { r: 1, g: 2, b: 255 });
    }

    #[test]
    fn qr_defaults() {
        let opts = QrOptions::default();
        assert_eq!(opts.size, 200);
        assert_eq!(opts.foreground, Color::BLACK);
        assert_eq!(opts.background, Color::WHITE);
    }

    #[test]
    fn barcode_defaults() {
        let opts = BarcodeOptions::default();
        assert_eq!(opts.format, Symbology::Code128);
        assert!((opts.width - 2.0).abs() < f32::EPSILON);
        assert_eq!(opts.height, 100);
        assert!(opts.display_value);
    }

    #[test]
    fn options_kind() {
        assert_eq!(RenderOptions::Qr(QrOptions::default()).kind(), SymbolKind::Qr);
        assert_eq!(RenderOptions::Barcode(BarcodeOptions::default()).kind(), SymbolKind::Barcode);
    }

    #[test]
    fn validate_numeric_ranges() {
        assert!(validate_qr_size(200).is_ok());
        assert!(validate_qr_size(0).is_err());
        assert!(validate_bar_width(1.5).is_ok());
        assert!(validate_bar_width(0.0).is_err());
        assert!(validate_bar_width(f32::NAN).is_err());
        assert!(validate_bar_height(100).is_ok());
        assert!(validate_bar_height(0).is_err());
    }

    #[test]
    fn option_sets_validate_every_range() {
        assert!(RenderOptions::Qr(QrOptions::default()).validate().is_ok());
        assert!(RenderOptions::Barcode(BarcodeOptions::default()).validate().is_ok());

        let tall = BarcodeOptions { height: u32::MAX, ..BarcodeOptions::default() };
        assert!(tall.validate().unwrap_err().contains("bar height"));
        let flat = BarcodeOptions { width: -2.0, ..BarcodeOptions::default() };
        assert!(flat.validate().unwrap_err().contains("bar width"));
        let huge = QrOptions { size: 5000, ..QrOptions::default() };
        assert!(RenderOptions::Qr(huge).validate().unwrap_err().contains("QR size"));
    }

    #[test]
    fn validate_format_valid() {
        assert!(validate_format("png").is_ok());
        assert!(validate_format("jpeg").is_ok());
        assert!(validate_format("webp").is_ok());
    }

    #[test]
    fn validate_format_invalid() {
        assert!(validate_format("gif").is_err());
        assert!(validate_format("jpg").is_err());
    }
}
