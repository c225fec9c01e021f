//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::params::{BarcodeOptions, QrOptions};
use crate::view::DEFAULT_PAGE_SIZE;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Where persisted state lives.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Gallery presentation.
    #[serde(default)]
    pub gallery: GalleryConfig,

    /// Default QR options.
    #[serde(default)]
    pub qr: QrOptions,

    /// Default barcode options.
    #[serde(default)]
    pub barcode: BarcodeOptions,
}

/// Storage configuration.
#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `storage.json`.
    pub data_dir: Option<String>,
}

/// Gallery configuration.
#[derive(Debug, Deserialize)]
pub struct GalleryConfig {
    /// Items per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
        if config.gallery.page_size == 0 {
            return Err(format!("Invalid page_size 0 in {}", path.display()));
        }
        config.qr.validate().map_err(|e| format!("Invalid [qr] in {}: {e}", path.display()))?;
        config
            .barcode
            .validate()
            .map_err(|e| format!("Invalid [barcode] in {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Resolve the data directory, preferring the explicit flag, then the
    /// `CODECRAFT_DATA_DIR` environment variable, then the config file.
    #[must_use]
    pub fn data_dir(&self, explicit: Option<&str>) -> PathBuf {
        if let Some(p) = explicit {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CODECRAFT_DATA_DIR") {
            return PathBuf::from(p);
        }
        self.storage.data_dir.as_deref().map_or_else(default_data_dir, expand_home)
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `CODECRAFT_CONFIG` environment variable
/// 3. `~/.config/codecraft/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("CODECRAFT_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/codecraft/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/codecraft/config.toml")
    } else {
        PathBuf::from("codecraft.toml")
    }
}

/// Default data directory: `~/.local/share/codecraft`.
fn default_data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local/share/codecraft")
    } else {
        PathBuf::from(".codecraft")
    }
}

/// Expand a leading `~/` to `$HOME`.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Symbology;
    use crate::params::Color;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.gallery.page_size, 4);
        assert_eq!(config.qr, QrOptions::default());
        assert_eq!(config.barcode, BarcodeOptions::default());
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.gallery.page_size, 4);
    }

    #[test]
    fn load_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r##"
[storage]
data_dir = "/tmp/codecraft-data"

[gallery]
page_size = 6

[qr]
size = 320
foreground = "#112233"

[barcode]
format = "EAN13"
width = 1.5
line_color = "#f00"
"##,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.data_dir.as_deref(), Some("/tmp/codecraft-data"));
        assert_eq!(config.gallery.page_size, 6);
        assert_eq!(config.qr.size, 320);
        assert_eq!(config.qr.foreground, Color { r: 0x11, g: 0x22, b: 0x33 });
        assert_eq!(config.qr.background, Color::WHITE);
        assert_eq!(config.barcode.format, Symbology::Ean13);
        assert!((config.barcode.width - 1.5).abs() < f32::EPSILON);
        assert_eq!(config.barcode.height, 100);
        assert_eq!(config.barcode.line_color, Color { r: 0xFF, g: 0, b: 0 });
    }

    #[test]
    fn load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn load_rejects_bad_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("color.toml");
        std::fs::write(&path, "[qr]\nforeground = \"blue\"\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.contains("Failed to parse config"));
    }

    #[test]
    fn load_rejects_zero_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.toml");
        std::fs::write(&path, "[gallery]\npage_size = 0\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn load_rejects_out_of_range_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.toml");

        std::fs::write(&path, "[qr]\nsize = 100000\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.contains("Invalid [qr]") && err.contains("QR size"));

        std::fs::write(&path, "[barcode]\nwidth = -1.0\n").unwrap();
        assert!(Config::load(&path).unwrap_err().contains("bar width"));

        std::fs::write(&path, "[barcode]\nheight = 4294967295\n").unwrap();
        assert!(Config::load(&path).unwrap_err().contains("bar height"));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = Config {
            storage: StorageConfig { data_dir: Some("/from/config".into()) },
            ..Config::default()
        };
        assert_eq!(config.data_dir(Some("/from/flag")), PathBuf::from("/from/flag"));
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
