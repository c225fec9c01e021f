//! Command-driven UI controller.
//!
//! Every user action is a [`Command`]. The controller applies it to the
//! renderers, the gallery and the view, and answers with a [`Feedback`]
//! describing what the surface should show. Errors never escape
//! [`Controller::dispatch`]; they become placeholder messages and notices.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::context::{Renderers, ServiceContext};
use crate::gallery::{GalleryStore, SavedItem};
use crate::model::{Filter, SymbolKind, Symbology};
use crate::output::{download_path, save_image};
use crate::params::{validate_format, BarcodeOptions, Color, QrOptions, RenderOptions};
use crate::ports::{RenderedImage, SurfaceHost, SurfaceRequest};
use crate::preferences::Preferences;
use crate::view::ViewState;

/// Shown when there is nothing to render.
pub const EMPTY_PLACEHOLDER: &str = "Enter content to generate code";

/// Gallery labels longer than this are shortened.
const LABEL_LIMIT: usize = 15;

/// One user action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Switch between the QR and barcode inputs.
    SwitchTab(SymbolKind),
    /// Replace the active input text.
    SetContent(String),
    /// Empty the active input text.
    ClearInput,
    /// QR image size in pixels.
    SetQrSize(u32),
    /// QR dark module color.
    SetQrForeground(Color),
    /// QR light module color.
    SetQrBackground(Color),
    /// Barcode symbology.
    SetBarcodeFormat(Symbology),
    /// Barcode module width.
    SetBarcodeWidth(f32),
    /// Barcode bar height.
    SetBarcodeHeight(u32),
    /// Barcode bar color.
    SetBarcodeLineColor(Color),
    /// Barcode background color.
    SetBarcodeBackground(Color),
    /// Whether to reserve the barcode text row.
    SetBarcodeDisplayValue(bool),
    /// Save the current image to the gallery.
    Save,
    /// Delete the gallery item at an absolute index.
    Delete(usize),
    /// Delete every gallery item.
    ClearGallery,
    /// Show only one kind of item.
    Filter(Filter),
    /// Next gallery page.
    NextPage,
    /// Previous gallery page.
    PrevPage,
    /// Jump to a gallery page.
    GoToPage(usize),
    /// Load a saved item into the output.
    Show(usize),
    /// Write the current image to `<dir>/<kind>_code.<format>`.
    Download {
        /// `png`, `jpeg` or `webp`.
        format: String,
        /// Target directory.
        #[serde(default = "current_dir")]
        dir: PathBuf,
    },
    /// Flip between light and dark theme.
    ToggleTheme,
    /// Move to the expanded side panel.
    OpenExpandedView,
    /// Move back to the compact popup.
    OpenCompactView,
    /// Ask whether the side panel is open.
    CheckExpandedView,
}

fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

/// What the output area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// A rendered or recalled symbol.
    Image {
        /// Kind of the symbol.
        kind: SymbolKind,
        /// The image.
        image: RenderedImage,
    },
    /// No image; a message instead.
    Placeholder(String),
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The command did what was asked.
    Info,
    /// The command failed.
    Error,
}

/// A one-off message about the last command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Human-readable text.
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// One visible gallery tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    /// Absolute index for [`Command::Delete`] and [`Command::Show`].
    pub index: usize,
    /// QR or barcode.
    pub kind: SymbolKind,
    /// Shortened content.
    pub label: String,
    /// When the item was saved.
    pub created_at: DateTime<Utc>,
}

/// The visible gallery page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySummary {
    /// Tiles on the current page.
    pub entries: Vec<GalleryEntry>,
    /// Active filter.
    pub filter: Filter,
    /// Current 1-based page.
    pub page: usize,
    /// Page count for the filter.
    pub total_pages: usize,
    /// Total saved items, ignoring the filter.
    pub saved: usize,
}

impl GallerySummary {
    /// Pagination controls are hidden for a single page.
    #[must_use]
    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }

    /// Whether "previous" is enabled.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether "next" is enabled.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// The surface's view after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Output area contents.
    pub output: Output,
    /// Message about the command, if it produced one.
    pub notice: Option<Notice>,
    /// Visible gallery page.
    pub gallery: GallerySummary,
    /// Dark theme active.
    pub dark: bool,
}

impl Feedback {
    /// Whether the command reported a failure.
    #[must_use]
    pub fn failed(&self) -> bool {
        matches!(&self.notice, Some(n) if n.level == NoticeLevel::Error)
    }
}

/// The symbol currently in the output area.
#[derive(Debug, Clone)]
struct Current {
    kind: SymbolKind,
    content: String,
    image: RenderedImage,
    /// Gallery index the image was recalled from, if any.
    recalled: Option<usize>,
}

/// Owns all session state and turns commands into feedback.
pub struct Controller {
    renderers: Renderers,
    surface: Arc<dyn SurfaceHost>,
    gallery: GalleryStore,
    prefs: Preferences,
    view: ViewState,
    tab: SymbolKind,
    qr_content: String,
    barcode_content: String,
    qr: QrOptions,
    barcode: BarcodeOptions,
    current: Option<Current>,
    placeholder: String,
}

impl Controller {
    /// Load persisted state and build a controller.
    pub async fn start(ctx: ServiceContext, page_size: usize) -> Self {
        let ServiceContext { renderers, store, surface } = ctx;
        let gallery = GalleryStore::load(Arc::clone(&store)).await;
        let prefs = Preferences::load(store).await;
        let announce = if prefs.side_panel_open() {
            SurfaceRequest::SidePanelOpened
        } else {
            SurfaceRequest::SidePanelClosed
        };
        surface.request(announce).await;
        Self {
            renderers,
            surface,
            gallery,
            prefs,
            view: ViewState::new(page_size),
            tab: SymbolKind::Qr,
            qr_content: String::new(),
            barcode_content: String::new(),
            qr: QrOptions::default(),
            barcode: BarcodeOptions::default(),
            current: None,
            placeholder: EMPTY_PLACEHOLDER.to_string(),
        }
    }

    /// Use `options` for QR renders. Does not render.
    #[must_use]
    pub fn with_qr_options(mut self, options: QrOptions) -> Self {
        self.qr = options;
        self
    }

    /// Use `options` for barcode renders. Does not render.
    #[must_use]
    pub fn with_barcode_options(mut self, options: BarcodeOptions) -> Self {
        self.barcode = options;
        self
    }

    /// Apply one command.
    pub async fn dispatch(&mut self, command: Command) -> Feedback {
        debug!(?command, "dispatch");
        let notice = self.apply(command).await;
        if let Some(n) = &notice {
            if n.level == NoticeLevel::Error {
                warn!("{}", n.message);
            }
        }
        self.feedback(notice)
    }

    /// Current feedback without changing anything.
    #[must_use]
    pub fn snapshot(&self) -> Feedback {
        self.feedback(None)
    }

    /// Wait for queued storage writes, then drop the session.
    pub async fn shutdown(self) {
        self.gallery.shutdown().await;
        self.prefs.shutdown().await;
    }

    async fn apply(&mut self, command: Command) -> Option<Notice> {
        match command {
            Command::SwitchTab(kind) => {
                self.tab = kind;
                self.clear_output(EMPTY_PLACEHOLDER);
                None
            }
            Command::SetContent(text) => {
                *self.content_mut() = text;
                self.regenerate()
            }
            Command::ClearInput => {
                self.content_mut().clear();
                self.regenerate()
            }
            Command::SetQrSize(size) => self.update_qr(|o| o.size = size),
            Command::SetQrForeground(c) => self.update_qr(|o| o.foreground = c),
            Command::SetQrBackground(c) => self.update_qr(|o| o.background = c),
            Command::SetBarcodeFormat(f) => self.update_barcode(|o| o.format = f),
            Command::SetBarcodeWidth(w) => self.update_barcode(|o| o.width = w),
            Command::SetBarcodeHeight(h) => self.update_barcode(|o| o.height = h),
            Command::SetBarcodeLineColor(c) => self.update_barcode(|o| o.line_color = c),
            Command::SetBarcodeBackground(c) => self.update_barcode(|o| o.background = c),
            Command::SetBarcodeDisplayValue(v) => self.update_barcode(|o| o.display_value = v),
            Command::Save => self.save(),
            Command::Delete(index) => Some(self.delete(index)),
            Command::ClearGallery => {
                if self.gallery.is_empty() {
                    return Some(Notice::info("Gallery is already empty"));
                }
                self.gallery.clear();
                self.remap_recalled(|_| None);
                self.view.clamp(self.gallery.items());
                Some(Notice::info("Gallery cleared"))
            }
            Command::Filter(filter) => {
                self.view.set_filter(filter);
                None
            }
            Command::NextPage => {
                self.view.next_page(self.gallery.items());
                None
            }
            Command::PrevPage => {
                self.view.prev_page();
                None
            }
            Command::GoToPage(page) => {
                self.view.go_to(page, self.gallery.items());
                None
            }
            Command::Show(index) => Some(self.show(index)),
            Command::Download { format, dir } => Some(self.download(&format, dir)),
            Command::ToggleTheme => {
                let dark = self.prefs.toggle_theme();
                Some(Notice::info(if dark { "Dark theme" } else { "Light theme" }))
            }
            Command::OpenExpandedView => Some(self.surface_request(SurfaceRequest::OpenSidePanel).await),
            Command::OpenCompactView => Some(self.surface_request(SurfaceRequest::OpenPopup).await),
            Command::CheckExpandedView => {
                Some(self.surface_request(SurfaceRequest::CheckSidePanel).await)
            }
        }
    }

    fn content_mut(&mut self) -> &mut String {
        match self.tab {
            SymbolKind::Qr => &mut self.qr_content,
            SymbolKind::Barcode => &mut self.barcode_content,
        }
    }

    fn update_qr(&mut self, change: impl FnOnce(&mut QrOptions)) -> Option<Notice> {
        change(&mut self.qr);
        (self.tab == SymbolKind::Qr).then(|| self.regenerate()).flatten()
    }

    fn update_barcode(&mut self, change: impl FnOnce(&mut BarcodeOptions)) -> Option<Notice> {
        change(&mut self.barcode);
        (self.tab == SymbolKind::Barcode).then(|| self.regenerate()).flatten()
    }

    /// Re-render the active tab from its current input.
    fn regenerate(&mut self) -> Option<Notice> {
        let (content, options) = match self.tab {
            SymbolKind::Qr => (self.qr_content.trim().to_string(), RenderOptions::Qr(self.qr.clone())),
            SymbolKind::Barcode => {
                (self.barcode_content.trim().to_string(), RenderOptions::Barcode(self.barcode.clone()))
            }
        };
        if content.is_empty() {
            self.clear_output(EMPTY_PLACEHOLDER);
            return None;
        }
        match self.renderers.render(&content, &options) {
            Ok(image) => {
                self.current = Some(Current { kind: self.tab, content, image, recalled: None });
                None
            }
            Err(e) => {
                let message = format!("Error: {e}");
                self.clear_output(&message);
                Some(Notice::error(message))
            }
        }
    }

    fn clear_output(&mut self, placeholder: &str) {
        self.current = None;
        self.placeholder = placeholder.to_string();
    }

    fn save(&mut self) -> Option<Notice> {
        let current = self.current.as_ref()?;
        if let Some(index) = current.recalled {
            return Some(Notice::info(format!("Already saved as #{index}")));
        }
        let item = SavedItem::new(current.kind, current.content.clone(), current.image.clone());
        self.gallery.append(item);
        info!(saved = self.gallery.len(), "saved to gallery");
        Some(Notice::info(format!("Saved as #{}", self.gallery.len() - 1)))
    }

    fn delete(&mut self, index: usize) -> Notice {
        match self.gallery.remove_at(index) {
            Ok(item) => {
                self.remap_recalled(|r| match r.cmp(&index) {
                    Ordering::Less => Some(r),
                    Ordering::Equal => None,
                    Ordering::Greater => Some(r - 1),
                });
                self.view.clamp(self.gallery.items());
                Notice::info(format!("Deleted {} '{}'", item.kind(), label(item.content())))
            }
            Err(e) => Notice::error(e.to_string()),
        }
    }

    /// Re-point or drop the gallery link of a recalled image after removals.
    fn remap_recalled(&mut self, remap: impl FnOnce(usize) -> Option<usize>) {
        if let Some(current) = &mut self.current {
            current.recalled = current.recalled.and_then(remap);
        }
    }

    fn show(&mut self, index: usize) -> Notice {
        let Some(item) = self.gallery.get(index) else {
            return Notice::error(format!("No saved item at index {index}"));
        };
        self.current = Some(Current {
            kind: item.kind(),
            content: item.content().to_string(),
            image: item.image().clone(),
            recalled: Some(index),
        });
        Notice::info(format!("Showing {} '{}'", item.kind(), label(item.content())))
    }

    fn download(&self, format: &str, dir: PathBuf) -> Notice {
        let Some(current) = &self.current else {
            return Notice::error("Nothing to download");
        };
        if let Err(e) = validate_format(format) {
            return Notice::error(e);
        }
        let path = download_path(&dir, current.kind, format);
        match save_image(&current.image.data, &current.image.mime_type, format, &path) {
            Ok(()) => Notice::info(format!("Saved: {}", path.display())),
            Err(e) => Notice::error(e.to_string()),
        }
    }

    async fn surface_request(&mut self, request: SurfaceRequest) -> Notice {
        let ack = self.surface.request(request).await;
        if !ack.success {
            return Notice::error(format!("{request:?} was not acknowledged"));
        }
        self.prefs.set_side_panel_open(ack.is_open);
        Notice::info(if ack.is_open { "Side panel open" } else { "Side panel closed" })
    }

    fn feedback(&self, notice: Option<Notice>) -> Feedback {
        let output = match &self.current {
            Some(c) => Output::Image { kind: c.kind, image: c.image.clone() },
            None => Output::Placeholder(self.placeholder.clone()),
        };
        let page = self.view.visible(self.gallery.items());
        let entries = page
            .entries
            .iter()
            .map(|e| GalleryEntry {
                index: e.index,
                kind: e.item.kind(),
                label: label(e.item.content()),
                created_at: e.item.created_at(),
            })
            .collect();
        Feedback {
            output,
            notice,
            gallery: GallerySummary {
                entries,
                filter: self.view.filter(),
                page: self.view.page(),
                total_pages: page.total_pages,
                saved: self.gallery.len(),
            },
            dark: self.prefs.dark(),
        }
    }
}

/// Shorten content for a gallery tile.
fn label(content: &str) -> String {
    if content.chars().count() > LABEL_LIMIT {
        let head: String = content.chars().take(LABEL_LIMIT).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}
