//! Symbol kinds, barcode symbologies and gallery filters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two families of symbols codecraft can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// A QR code.
    Qr,
    /// A linear barcode.
    Barcode,
}

impl SymbolKind {
    /// Lowercase tag used in file names and storage.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Qr => "qr",
            Self::Barcode => "barcode",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qr => f.write_str("QR"),
            Self::Barcode => f.write_str("Barcode"),
        }
    }
}

/// Barcode symbologies supported by the barcode renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Symbology {
    /// Code 128 (character set B).
    Code128,
    /// Code 39.
    Code39,
    /// Code 93.
    Code93,
    /// EAN-13.
    Ean13,
    /// EAN-8.
    Ean8,
    /// Interleaved 2 of 5.
    Itf,
    /// Codabar.
    Codabar,
}

/// Alternate spellings accepted for symbology names.
const ALIASES: &[(&str, Symbology)] = &[
    ("code128", Symbology::Code128),
    ("code-128", Symbology::Code128),
    ("code39", Symbology::Code39),
    ("code-39", Symbology::Code39),
    ("code93", Symbology::Code93),
    ("code-93", Symbology::Code93),
    ("ean13", Symbology::Ean13),
    ("ean-13", Symbology::Ean13),
    ("ean", Symbology::Ean13),
    ("ean8", Symbology::Ean8),
    ("ean-8", Symbology::Ean8),
    ("itf", Symbology::Itf),
    ("i2of5", Symbology::Itf),
    ("codabar", Symbology::Codabar),
];

impl Symbology {
    /// Canonical uppercase name, as shown to users.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Code128 => "CODE128",
            Self::Code39 => "CODE39",
            Self::Code93 => "CODE93",
            Self::Ean13 => "EAN13",
            Self::Ean8 => "EAN8",
            Self::Itf => "ITF",
            Self::Codabar => "CODABAR",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a symbology name or alias, case-insensitively.
///
/// # Errors
///
/// Returns an error if the name matches no supported symbology.
pub fn resolve_symbology(name: &str) -> Result<Symbology, String> {
    let lowered = name.trim().to_ascii_lowercase();
    ALIASES.iter().find(|(alias, _)| *alias == lowered).map(|&(_, s)| s).ok_or_else(|| {
        format!(
            "Unsupported barcode format '{name}'. Valid: CODE128, CODE39, CODE93, EAN13, EAN8, \
             ITF, CODABAR"
        )
    })
}

/// Which saved items the gallery shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every item.
    #[default]
    All,
    /// QR codes only.
    Qr,
    /// Barcodes only.
    Barcode,
}

impl Filter {
    /// Whether an item of `kind` passes this filter.
    #[must_use]
    pub fn admits(self, kind: SymbolKind) -> bool {
        match self {
            Self::All => true,
            Self::Qr => kind == SymbolKind::Qr,
            Self::Barcode => kind == SymbolKind::Barcode,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Qr => f.write_str("qr"),
            Self::Barcode => f.write_str("barcode"),
        }
    }
}

/// Parse a filter name (`all`, `qr`, `barcode`).
///
/// # Errors
///
/// Returns an error for any other name.
pub fn parse_filter(name: &str) -> Result<Filter, String> {
    match name.to_ascii_lowercase().as_str() {
        "all" => Ok(Filter::All),
        "qr" => Ok(Filter::Qr),
        "barcode" => Ok(Filter::Barcode),
        _ => Err(format!("Unknown filter '{name}'. Valid: all, qr, barcode")),
    }
}
