//! Symbol renderer port for QR and barcode encoders.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::params::RenderOptions;

/// A rendered symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedImage {
    /// Encoded image bytes (serialized as base64).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type of the image (e.g., `"image/png"`).
    pub mime_type: String,
}

impl RenderedImage {
    /// Wrap PNG bytes.
    #[must_use]
    pub fn png(data: Vec<u8>) -> Self {
        Self { data, mime_type: "image/png".into() }
    }
}

/// Encodes text into a symbol image.
///
/// Implementations are synchronous and deterministic: the same content and
/// options always produce the same bytes.
pub trait SymbolRenderer {
    /// Render `content` with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidContent`] when the encoder rejects the
    /// content, or [`RenderError::Unavailable`] when the options target a
    /// kind this renderer cannot produce.
    fn render(&self, content: &str, options: &RenderOptions) -> Result<RenderedImage, RenderError>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in storage.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_image_stores_base64() {
        let image = RenderedImage::png(vec![0x89, 0x50, 0x4E, 0x47]);
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["data"], "iVBORw==");
        assert_eq!(json["mime_type"], "image/png");
    }

    #[test]
    fn rejects_invalid_base64() {
        let json = r#"{"data":"***","mime_type":"image/png"}"#;
        assert!(serde_json::from_str::<RenderedImage>(json).is_err());
    }
}
