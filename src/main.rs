//! Codecraft - QR code and barcode generator CLI.

mod adapters;
mod cli;
mod config;
mod context;
mod controller;
mod error;
mod gallery;
mod model;
mod output;
mod params;
mod persist;
mod ports;
mod preferences;
mod script;
mod view;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{BarcodeArgs, Cli, CliCommand, GalleryCommand, GenerateArgs, QrArgs};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::controller::{Command, Controller, Feedback, GallerySummary, Output};
use crate::error::AppError;
use crate::model::SymbolKind;
use crate::params::{validate_bar_height, validate_bar_width, validate_format, validate_qr_size};
use crate::script::{load_script, replay};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(AppError::Config)?;
    let data_dir = config.data_dir(cli.data_dir.as_deref());
    debug!(config = %config_path.display(), data_dir = %data_dir.display(), "resolved paths");

    // Validate before touching storage
    let commands = plan(&cli.command)?;

    let ctx = if let CliCommand::Replay { dry_run: true, .. } = cli.command {
        info!("dry run, storage stays in memory");
        ServiceContext::ephemeral()
    } else {
        ServiceContext::live(&data_dir)
    };
    let mut controller = Controller::start(ctx, config.gallery.page_size)
        .await
        .with_qr_options(config.qr.clone())
        .with_barcode_options(config.barcode.clone());

    let result = match commands {
        Plan::Commands(commands) => execute(&mut controller, commands).await,
        Plan::Script(path) => run_script(&mut controller, &path).await,
    };

    // Flush queued storage writes even when a command failed
    controller.shutdown().await;

    let last = result?;
    match cli.command {
        CliCommand::Qr(_) | CliCommand::Barcode(_) => match &last.output {
            Output::Image { kind, image } => {
                debug!(%kind, bytes = image.data.len(), mime = %image.mime_type, "rendered");
            }
            Output::Placeholder(message) => eprintln!("{message}"),
        },
        CliCommand::Gallery(GalleryCommand::List { .. }) => print_gallery(&last.gallery),
        CliCommand::Theme => println!("Theme: {}", if last.dark { "dark" } else { "light" }),
        _ => {}
    }
    Ok(())
}

/// What a subcommand turns into.
enum Plan {
    Commands(Vec<Command>),
    Script(PathBuf),
}

/// Translate a subcommand into controller commands, validating arguments.
fn plan(command: &CliCommand) -> Result<Plan, AppError> {
    let commands = match command {
        CliCommand::Qr(args) => plan_qr(args)?,
        CliCommand::Barcode(args) => plan_barcode(args)?,
        CliCommand::Gallery(GalleryCommand::List { filter, page }) => {
            vec![Command::Filter(*filter), Command::GoToPage(*page)]
        }
        CliCommand::Gallery(GalleryCommand::Delete { index }) => vec![Command::Delete(*index)],
        CliCommand::Gallery(GalleryCommand::Clear) => vec![Command::ClearGallery],
        CliCommand::Gallery(GalleryCommand::Export { index, format, out_dir }) => {
            validate_format(format).map_err(AppError::InvalidArgument)?;
            vec![
                Command::Show(*index),
                Command::Download { format: format.clone(), dir: PathBuf::from(out_dir) },
            ]
        }
        CliCommand::Theme => vec![Command::ToggleTheme],
        CliCommand::Panel { action } => match action.as_str() {
            "open" => vec![Command::OpenExpandedView],
            "close" => vec![Command::OpenCompactView],
            _ => vec![Command::CheckExpandedView],
        },
        CliCommand::Replay { script, .. } => return Ok(Plan::Script(PathBuf::from(script))),
    };
    Ok(Plan::Commands(commands))
}

fn plan_qr(args: &QrArgs) -> Result<Vec<Command>, AppError> {
    require_content(&args.content)?;
    let mut commands = vec![Command::SwitchTab(SymbolKind::Qr)];
    if let Some(size) = args.size {
        validate_qr_size(size).map_err(AppError::InvalidArgument)?;
        commands.push(Command::SetQrSize(size));
    }
    commands.extend(args.foreground.map(Command::SetQrForeground));
    commands.extend(args.background.map(Command::SetQrBackground));
    commands.push(Command::SetContent(args.content.clone()));
    commands.extend(plan_generate(&args.generate)?);
    Ok(commands)
}

fn plan_barcode(args: &BarcodeArgs) -> Result<Vec<Command>, AppError> {
    require_content(&args.content)?;
    let mut commands = vec![Command::SwitchTab(SymbolKind::Barcode)];
    commands.extend(args.format.map(Command::SetBarcodeFormat));
    if let Some(width) = args.width {
        validate_bar_width(width).map_err(AppError::InvalidArgument)?;
        commands.push(Command::SetBarcodeWidth(width));
    }
    if let Some(height) = args.height {
        validate_bar_height(height).map_err(AppError::InvalidArgument)?;
        commands.push(Command::SetBarcodeHeight(height));
    }
    commands.extend(args.line_color.map(Command::SetBarcodeLineColor));
    commands.extend(args.background.map(Command::SetBarcodeBackground));
    if args.no_value {
        commands.push(Command::SetBarcodeDisplayValue(false));
    }
    commands.push(Command::SetContent(args.content.clone()));
    commands.extend(plan_generate(&args.generate)?);
    Ok(commands)
}

/// `--save` and `--download`. Without either, the image is written as PNG.
fn plan_generate(args: &GenerateArgs) -> Result<Vec<Command>, AppError> {
    let mut commands = Vec::new();
    if args.save {
        commands.push(Command::Save);
    }
    let format = match (&args.download, args.save) {
        (Some(format), _) => Some(format.clone()),
        (None, false) => Some("png".to_string()),
        (None, true) => None,
    };
    if let Some(format) = format {
        validate_format(&format).map_err(AppError::InvalidArgument)?;
        commands.push(Command::Download { format, dir: PathBuf::from(&args.out_dir) });
    }
    Ok(commands)
}

fn require_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::InvalidArgument("Content must not be empty".into()));
    }
    Ok(())
}

/// Dispatch commands in order, stopping at the first failure.
async fn execute(controller: &mut Controller, commands: Vec<Command>) -> Result<Feedback, AppError> {
    let mut last = controller.snapshot();
    for command in commands {
        let feedback = controller.dispatch(command).await;
        report(&feedback)?;
        last = feedback;
    }
    Ok(last)
}

async fn run_script(controller: &mut Controller, path: &Path) -> Result<Feedback, AppError> {
    let script = load_script(path).map_err(AppError::Script)?;
    let name = script.name.as_deref().unwrap_or("unnamed");
    info!(%name, commands = script.commands.len(), "replaying");
    let feedback = replay(controller, &script).await;
    let mut failed = 0;
    for fb in &feedback {
        if let Err(e) = report(fb) {
            eprintln!("Error: {e}");
            failed += 1;
        }
    }
    println!("Replayed {} commands, {failed} failed", feedback.len());
    Ok(feedback.last().cloned().unwrap_or_else(|| controller.snapshot()))
}

/// Print a command's notice, turning a failure into an error.
fn report(feedback: &Feedback) -> Result<(), AppError> {
    match &feedback.notice {
        Some(notice) if feedback.failed() => {
            Err(AppError::Command(notice.message.trim_start_matches("Error: ").to_string()))
        }
        Some(notice) => {
            eprintln!("{}", notice.message);
            Ok(())
        }
        None => Ok(()),
    }
}

fn print_gallery(summary: &GallerySummary) {
    if summary.saved == 0 {
        println!("No saved codes");
    } else if summary.entries.is_empty() {
        println!("No saved codes match filter: {}", summary.filter);
    }
    for entry in &summary.entries {
        println!(
            "#{:<3} {:<8} {}  {}",
            entry.index,
            entry.kind.to_string(),
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.label
        );
    }
    if summary.total_pages == 0 {
        return;
    }
    let mut footer = format!(
        "Page {} of {} ({} saved, filter: {})",
        summary.page, summary.total_pages, summary.saved, summary.filter
    );
    if summary.show_pagination() {
        if summary.has_prev() {
            footer.push_str(&format!("  prev: --page {}", summary.page - 1));
        }
        if summary.has_next() {
            footer.push_str(&format!("  next: --page {}", summary.page + 1));
        }
    }
    println!("{footer}");
}
