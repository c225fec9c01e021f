//! QR renderer using the `qrcode` crate.

use image::RgbImage;
use qrcode::QrCode;

use super::encode_png;
use crate::error::RenderError;
use crate::model::SymbolKind;
use crate::params::{QrOptions, RenderOptions};
use crate::ports::{RenderedImage, SymbolRenderer};

/// Light modules around the symbol, in module units.
const QUIET_ZONE: usize = 4;

/// Renders QR codes into square PNG images.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrRenderer;

impl QrRenderer {
    /// Create a new QR renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SymbolRenderer for QrRenderer {
    fn render(&self, content: &str, options: &RenderOptions) -> Result<RenderedImage, RenderError> {
        let RenderOptions::Qr(opts) = options else {
            return Err(RenderError::Unavailable(SymbolKind::Barcode));
        };
        opts.validate().map_err(RenderError::InvalidContent)?;
        let code =
            QrCode::new(content.as_bytes()).map_err(|e| RenderError::InvalidContent(e.to_string()))?;
        encode_png(rasterize(&code, opts))
    }
}

/// Draw the module grid centered on a `size`×`size` canvas.
///
/// Modules are scaled by an integer factor so edges stay crisp; if `size` is
/// smaller than one pixel per module the canvas grows to fit.
fn rasterize(code: &QrCode, opts: &QrOptions) -> RgbImage {
    let modules = code.width();
    let colors = code.to_colors();
    let total = modules + 2 * QUIET_ZONE;
    let requested = opts.size as usize;
    let scale = (requested / total).max(1);
    let dim = requested.max(scale * total);
    let offset = (dim - scale * total) / 2 + QUIET_ZONE * scale;

    let dim_px = u32::try_from(dim).unwrap_or(u32::MAX);
    let mut raster = RgbImage::from_pixel(dim_px, dim_px, opts.background.to_rgb());
    let fg = opts.foreground.to_rgb();

    for (i, color) in colors.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let (mx, my) = (i % modules, i / modules);
        let (x0, y0) = (offset + mx * scale, offset + my * scale);
        for y in y0..y0 + scale {
            for x in x0..x0 + scale {
                #[allow(clippy::cast_possible_truncation)]
                raster.put_pixel(x as u32, y as u32, fg);
            }
        }
    }
    raster
}
