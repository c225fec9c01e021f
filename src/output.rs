//! Download file naming, image saving, and format conversion.

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::model::SymbolKind;

/// Download file name for a symbol kind: `<kind>_code.<format>`.
#[must_use]
pub fn download_filename(kind: SymbolKind, format: &str) -> String {
    format!("{}_code.{format}", kind.tag())
}

/// Full download path inside `dir`.
#[must_use]
pub fn download_path(dir: &Path, kind: SymbolKind, format: &str) -> PathBuf {
    dir.join(download_filename(kind, format))
}

/// Save raw image bytes to a file, converting format if necessary.
///
/// # Errors
///
/// Returns an error if the file cannot be written or format conversion fails.
pub fn save_image(
    data: &[u8],
    source_mime: &str,
    target_format: &str,
    output_path: &Path,
) -> Result<(), AppError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if mime_matches_format(source_mime, target_format) {
        std::fs::write(output_path, data).map_err(AppError::Io)
    } else {
        convert_and_save(data, target_format, output_path)
    }
}

/// Check if a MIME type matches the requested output format.
fn mime_matches_format(mime: &str, format: &str) -> bool {
    matches!((mime, format), ("image/jpeg", "jpeg") | ("image/png", "png") | ("image/webp", "webp"))
}

/// Convert image bytes to the target format and save.
fn convert_and_save(data: &[u8], target_format: &str, output_path: &Path) -> Result<(), AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::ImageConversion(format!("Failed to decode image: {e}")))?;

    let image_format = match target_format {
        "jpeg" => image::ImageFormat::Jpeg,
        "png" => image::ImageFormat::Png,
        "webp" => image::ImageFormat::WebP,
        other => {
            return Err(AppError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };

    // JPEG has no alpha channel.
    img.into_rgb8()
        .save_with_format(output_path, image_format)
        .map_err(|e| AppError::ImageConversion(format!("Failed to save as {target_format}: {e}")))
}
