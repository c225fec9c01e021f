//! Service context that bundles all port trait objects.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::adapters::live::barcode::BarcodeRenderer;
use crate::adapters::live::qr::QrRenderer;
use crate::adapters::storage::{FileStore, MemoryStore};
use crate::adapters::surface::LocalSurfaceHost;
use crate::error::RenderError;
use crate::model::SymbolKind;
use crate::params::RenderOptions;
use crate::ports::{KeyValueStore, RenderedImage, SurfaceHost, SymbolRenderer};

/// The encoders available to this process, one slot per symbol kind.
#[derive(Default)]
pub struct Renderers {
    qr: Option<Box<dyn SymbolRenderer>>,
    barcode: Option<Box<dyn SymbolRenderer>>,
}

impl Renderers {
    /// Registry with both live encoders.
    #[must_use]
    pub fn live() -> Self {
        Self { qr: Some(Box::new(QrRenderer::new())), barcode: Some(Box::new(BarcodeRenderer::new())) }
    }

    /// Replace the encoder for `kind`.
    #[must_use]
    pub fn with(mut self, kind: SymbolKind, renderer: Box<dyn SymbolRenderer>) -> Self {
        match kind {
            SymbolKind::Qr => self.qr = Some(renderer),
            SymbolKind::Barcode => self.barcode = Some(renderer),
        }
        self
    }

    /// Render trimmed `content` with the encoder matching `options`.
    ///
    /// # Errors
    ///
    /// [`RenderError::Unavailable`] if no encoder is registered for the kind,
    /// [`RenderError::InvalidContent`] if the content is empty or rejected, or
    /// the options are out of range.
    pub fn render(&self, content: &str, options: &RenderOptions) -> Result<RenderedImage, RenderError> {
        let kind = options.kind();
        let renderer = match kind {
            SymbolKind::Qr => self.qr.as_deref(),
            SymbolKind::Barcode => self.barcode.as_deref(),
        }
        .ok_or(RenderError::Unavailable(kind))?;

        let content = content.trim();
        if content.is_empty() {
            return Err(RenderError::InvalidContent("Content must not be empty".into()));
        }
        options.validate().map_err(RenderError::InvalidContent)?;
        debug!(%kind, len = content.len(), "rendering");
        renderer.render(content, options)
    }
}

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Symbol encoders.
    pub renderers: Renderers,
    /// Local key-value storage.
    pub store: Arc<dyn KeyValueStore>,
    /// Presentation-surface host.
    pub surface: Arc<dyn SurfaceHost>,
}

impl ServiceContext {
    /// Live context persisting under `data_dir`.
    #[must_use]
    pub fn live(data_dir: &Path) -> Self {
        let store = FileStore::in_dir(data_dir);
        debug!(path = %store.path().display(), "file storage");
        Self {
            renderers: Renderers::live(),
            store: Arc::new(store),
            surface: Arc::new(LocalSurfaceHost::new()),
        }
    }

    /// Live encoders with storage that disappears with the process.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            renderers: Renderers::live(),
            store: Arc::new(MemoryStore::new()),
            surface: Arc::new(LocalSurfaceHost::new()),
        }
    }
}
