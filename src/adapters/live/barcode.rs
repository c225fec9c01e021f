//! Linear barcode renderer using the `barcoders` crate.

use ab_glyph::{FontRef, PxScale};
use barcoders::sym::codabar::Codabar;
use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use barcoders::sym::ean13::EAN13;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::tf::TF;
use image::RgbImage;
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::warn;

use super::encode_png;
use crate::error::RenderError;
use crate::model::{SymbolKind, Symbology};
use crate::params::{BarcodeOptions, RenderOptions};
use crate::ports::{RenderedImage, SymbolRenderer};

/// Blank pixels on every side of the bars.
const MARGIN: u32 = 10;

/// Height of the band holding the human-readable value.
const TEXT_BAND: u32 = 20;

/// Glyph height of the human-readable value.
const TEXT_SCALE: f32 = 16.0;

/// Gap between the bars and the value.
const TEXT_GAP: u32 = 2;

/// Monospace face for the human-readable value.
static VALUE_FONT: &[u8] = include_bytes!("../../../assets/DejaVuSansMono.ttf");

/// Code 128 character-set B selector expected by `barcoders`.
const CODE128_SET_B: char = 'Ɓ';

/// Renders linear barcodes into PNG images.
#[derive(Debug, Default, Clone, Copy)]
pub struct BarcodeRenderer;

impl BarcodeRenderer {
    /// Create a new barcode renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SymbolRenderer for BarcodeRenderer {
    fn render(&self, content: &str, options: &RenderOptions) -> Result<RenderedImage, RenderError> {
        let RenderOptions::Barcode(opts) = options else {
            return Err(RenderError::Unavailable(SymbolKind::Qr));
        };
        opts.validate().map_err(RenderError::InvalidContent)?;
        let (modules, value) = encode_modules(opts.format, content)?;
        let mut raster = rasterize(&modules, opts);
        if opts.display_value {
            draw_value(&mut raster, &value, opts);
        }
        encode_png(raster)
    }
}

/// Encode `content` into a bar/space module sequence (1 = bar) and the
/// human-readable value printed under it.
fn encode_modules(format: Symbology, content: &str) -> Result<(Vec<u8>, String), RenderError> {
    let invalid = |e: barcoders::error::Error| RenderError::InvalidContent(e.to_string());
    let modules = match format {
        Symbology::Code128 => {
            Code128::new(format!("{CODE128_SET_B}{content}")).map(|b| b.encode()).map_err(invalid)
        }
        Symbology::Code39 => Code39::new(content).map(|b| b.encode()).map_err(invalid),
        Symbology::Code93 => Code93::new(content).map(|b| b.encode()).map_err(invalid),
        Symbology::Ean13 => {
            let data = strip_check_digit(content, 12, "EAN13")?;
            let value = format!("{data}{}", ean_check_digit(data));
            return Ok((EAN13::new(data).map(|b| b.encode()).map_err(invalid)?, value));
        }
        Symbology::Ean8 => {
            let data = strip_check_digit(content, 7, "EAN8")?;
            let value = format!("{data}{}", ean_check_digit(data));
            return Ok((EAN8::new(data).map(|b| b.encode()).map_err(invalid)?, value));
        }
        Symbology::Itf => TF::interleaved(content).map(|b| b.encode()).map_err(invalid),
        Symbology::Codabar => Codabar::new(content).map(|b| b.encode()).map_err(invalid),
    }?;
    Ok((modules, content.to_string()))
}

/// Accept EAN data with or without its trailing check digit.
///
/// The encoder computes the check digit itself, so a supplied one is verified
/// and dropped.
fn strip_check_digit<'a>(
    content: &'a str,
    data_len: usize,
    name: &str,
) -> Result<&'a str, RenderError> {
    if !content.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RenderError::InvalidContent(format!("{name} accepts digits only")));
    }
    if content.len() == data_len {
        return Ok(content);
    }
    if content.len() != data_len + 1 {
        return Err(RenderError::InvalidContent(format!(
            "{name} needs {data_len} digits, or {} with the check digit",
            data_len + 1
        )));
    }
    let (data, check) = content.split_at(data_len);
    let expected = ean_check_digit(data);
    if check.as_bytes()[0] - b'0' == expected {
        Ok(data)
    } else {
        Err(RenderError::InvalidContent(format!(
            "Invalid {name} check digit {check}, expected {expected}"
        )))
    }
}

/// EAN/UPC mod-10 check digit; the rightmost data digit has weight 3.
fn ean_check_digit(data: &str) -> u8 {
    let sum: u32 = data
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    u8::try_from((10 - sum % 10) % 10).unwrap_or_default()
}

/// Pixel column where module `i` starts, for fractional module widths.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn module_edge(i: usize, width: f32) -> u32 {
    (i as f32 * width).round() as u32
}

fn rasterize(modules: &[u8], opts: &BarcodeOptions) -> RgbImage {
    let bars_width = module_edge(modules.len(), opts.width);
    let text = if opts.display_value { TEXT_BAND } else { 0 };
    let width = bars_width.saturating_add(2 * MARGIN);
    let height = opts.height.saturating_add(text).saturating_add(2 * MARGIN);
    let bars_bottom = MARGIN.saturating_add(opts.height);

    let mut raster = RgbImage::from_pixel(width, height, opts.background.to_rgb());
    let line = opts.line_color.to_rgb();

    for (i, module) in modules.iter().enumerate() {
        if *module != 1 {
            continue;
        }
        let (start, end) = (module_edge(i, opts.width), module_edge(i + 1, opts.width));
        for x in MARGIN + start..MARGIN + end {
            for y in MARGIN..bars_bottom {
                raster.put_pixel(x, y, line);
            }
        }
    }
    raster
}

/// Print `value` centered in the band under the bars.
fn draw_value(raster: &mut RgbImage, value: &str, opts: &BarcodeOptions) {
    let font = match FontRef::try_from_slice(VALUE_FONT) {
        Ok(font) => font,
        Err(e) => {
            warn!("barcode value font unusable, leaving value out: {e}");
            return;
        }
    };
    let scale = PxScale::from(TEXT_SCALE);
    let (text_width, _) = text_size(scale, &font, value);
    let x = raster.width().saturating_sub(text_width) / 2;
    let y = MARGIN.saturating_add(opts.height).saturating_add(TEXT_GAP);
    let (x, y) = (i32::try_from(x).unwrap_or(i32::MAX), i32::try_from(y).unwrap_or(i32::MAX));
    draw_text_mut(raster, opts.line_color.to_rgb(), x, y, scale, &font, value);
}
