//! CLI argument parsing with clap.

use clap::{Args, Parser, Subcommand};

use crate::model::{parse_filter, resolve_symbology, Filter, Symbology};
use crate::params::{parse_color, Color};

/// QR code and barcode generator with a local gallery.
#[derive(Parser, Debug)]
#[command(name = "codecraft", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Directory for persisted gallery and preferences.
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Generate a QR code.
    Qr(QrArgs),
    /// Generate a barcode.
    Barcode(BarcodeArgs),
    /// Browse and manage saved codes.
    #[command(subcommand)]
    Gallery(GalleryCommand),
    /// Toggle between light and dark theme.
    Theme,
    /// Switch between the compact popup and the expanded side panel.
    Panel {
        /// `open`, `close` or `status`.
        #[arg(value_parser = ["open", "close", "status"])]
        action: String,
    },
    /// Replay a YAML command script.
    Replay {
        /// Path to the script file.
        script: String,

        /// Keep the gallery and preferences in memory only.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Options shared by the generating subcommands.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Add the result to the gallery.
    #[arg(long)]
    pub save: bool,

    /// Write the image as `<kind>_code.<FMT>` (png, jpeg, webp).
    #[arg(short, long, value_name = "FMT")]
    pub download: Option<String>,

    /// Directory for the downloaded file.
    #[arg(short, long, default_value = ".")]
    pub out_dir: String,
}

/// Arguments for `qr`.
#[derive(Args, Debug)]
pub struct QrArgs {
    /// Text to encode.
    pub content: String,

    /// Image size in pixels.
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Dark module color (#rgb or #rrggbb).
    #[arg(long, value_parser = parse_color)]
    pub foreground: Option<Color>,

    /// Light module color (#rgb or #rrggbb).
    #[arg(long, value_parser = parse_color)]
    pub background: Option<Color>,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub generate: GenerateArgs,
}

/// Arguments for `barcode`.
#[derive(Args, Debug)]
pub struct BarcodeArgs {
    /// Text to encode.
    pub content: String,

    /// Symbology: CODE128, CODE39, CODE93, EAN13, EAN8, ITF, CODABAR.
    #[arg(short, long, value_parser = resolve_symbology)]
    pub format: Option<Symbology>,

    /// Width of one module in pixels.
    #[arg(short, long)]
    pub width: Option<f32>,

    /// Bar height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Bar color (#rgb or #rrggbb).
    #[arg(long, value_parser = parse_color)]
    pub line_color: Option<Color>,

    /// Background color (#rgb or #rrggbb).
    #[arg(long, value_parser = parse_color)]
    pub background: Option<Color>,

    /// Do not print the value under the bars.
    #[arg(long)]
    pub no_value: bool,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub generate: GenerateArgs,
}

/// `gallery` subcommands.
#[derive(Subcommand, Debug)]
pub enum GalleryCommand {
    /// List one page of saved codes.
    List {
        /// all, qr or barcode.
        #[arg(short, long, default_value = "all", value_parser = parse_filter)]
        filter: Filter,

        /// 1-based page number.
        #[arg(short, long, default_value = "1")]
        page: usize,
    },
    /// Delete a saved code by index.
    Delete {
        /// Index shown by `gallery list`.
        index: usize,
    },
    /// Delete every saved code.
    Clear,
    /// Write a saved code to a file.
    Export {
        /// Index shown by `gallery list`.
        index: usize,

        /// png, jpeg or webp.
        #[arg(long, default_value = "png")]
        format: String,

        /// Directory for the downloaded file.
        #[arg(short, long, default_value = ".")]
        out_dir: String,
    },
}
