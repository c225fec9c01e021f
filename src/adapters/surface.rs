//! In-process surface host tracking the side panel and popup state.

use std::sync::Mutex;

use tracing::debug;

use crate::ports::surface::SurfaceFuture;
use crate::ports::{SurfaceAck, SurfaceHost, SurfaceRequest};

#[derive(Debug, Clone, Copy)]
struct SurfaceState {
    side_panel_open: bool,
    popup_enabled: bool,
}

/// Acknowledges every request and keeps the popup disabled while the side
/// panel is open.
#[derive(Debug)]
pub struct LocalSurfaceHost {
    state: Mutex<SurfaceState>,
}

impl Default for LocalSurfaceHost {
    fn default() -> Self {
        Self { state: Mutex::new(SurfaceState { side_panel_open: false, popup_enabled: true }) }
    }
}

impl LocalSurfaceHost {
    /// Host with the side panel closed and the popup enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the compact popup may be opened.
    #[cfg(test)]
    #[must_use]
    pub fn popup_enabled(&self) -> bool {
        self.state.lock().map_or(true, |s| s.popup_enabled)
    }

    fn handle(&self, request: SurfaceRequest) -> SurfaceAck {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match request {
            SurfaceRequest::OpenSidePanel | SurfaceRequest::SidePanelOpened => {
                state.side_panel_open = true;
                state.popup_enabled = false;
            }
            SurfaceRequest::SidePanelClosed | SurfaceRequest::OpenPopup => {
                state.side_panel_open = false;
                state.popup_enabled = true;
            }
            SurfaceRequest::CheckSidePanel => {}
        }
        debug!(?request, open = state.side_panel_open, "surface request handled");
        SurfaceAck { success: true, is_open: state.side_panel_open }
    }
}

impl SurfaceHost for LocalSurfaceHost {
    fn request(&self, request: SurfaceRequest) -> SurfaceFuture<'_> {
        Box::pin(std::future::ready(self.handle(request)))
    }
}
