//! Inter-surface messaging port (compact popup vs. expanded side panel).

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// A message sent from a surface to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceRequest {
    /// Switch to the expanded side panel.
    OpenSidePanel,
    /// The side panel reports it has opened.
    SidePanelOpened,
    /// The side panel reports it has closed.
    SidePanelClosed,
    /// Ask whether the side panel is open.
    CheckSidePanel,
    /// Switch back to the compact popup.
    OpenPopup,
}

/// The host's acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurfaceAck {
    /// Whether the host handled the request.
    pub success: bool,
    /// Side panel state after the request.
    pub is_open: bool,
}

/// Boxed future type returned by [`SurfaceHost::request`].
pub type SurfaceFuture<'a> = Pin<Box<dyn Future<Output = SurfaceAck> + Send + 'a>>;

/// Receives presentation-surface requests and acknowledges them.
pub trait SurfaceHost: Send + Sync {
    /// Handle one request.
    fn request(&self, request: SurfaceRequest) -> SurfaceFuture<'_>;
}
