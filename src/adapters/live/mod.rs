//! Renderers backed by the `qrcode` and `barcoders` encoders.

pub mod barcode;
pub mod qr;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::error::RenderError;
use crate::ports::RenderedImage;

/// Encode a finished raster as PNG.
fn encode_png(raster: RgbImage) -> Result<RenderedImage, RenderError> {
    let mut buf = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(raster)
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| RenderError::InvalidContent(format!("Failed to encode PNG: {e}")))?;
    Ok(RenderedImage::png(buf.into_inner()))
}
