//! Persisted UI preferences: theme and side panel state.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::persist::WriteBehind;
use crate::ports::KeyValueStore;

/// Storage key for the dark theme flag.
pub const THEME_KEY: &str = "isDark";

/// Storage key for the side panel flag.
pub const SIDE_PANEL_KEY: &str = "sidePanelOpen";

/// Small flags that outlive a session.
#[derive(Debug)]
pub struct Preferences {
    dark: bool,
    side_panel_open: bool,
    writer: WriteBehind,
}

impl Preferences {
    /// Load flags from `store`; anything missing or unreadable is `false`.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let dark = read_flag(store.as_ref(), THEME_KEY).await;
        let side_panel_open = read_flag(store.as_ref(), SIDE_PANEL_KEY).await;
        Self { dark, side_panel_open, writer: WriteBehind::spawn(store) }
    }

    /// Whether the dark theme is active.
    #[must_use]
    pub fn dark(&self) -> bool {
        self.dark
    }

    /// Whether the side panel was last reported open.
    #[must_use]
    pub fn side_panel_open(&self) -> bool {
        self.side_panel_open
    }

    /// Flip the theme and persist it. Returns the new value.
    pub fn toggle_theme(&mut self) -> bool {
        self.dark = !self.dark;
        self.writer.set(THEME_KEY, Value::Bool(self.dark));
        self.dark
    }

    /// Record the side panel state.
    pub fn set_side_panel_open(&mut self, open: bool) {
        if self.side_panel_open != open {
            self.side_panel_open = open;
            self.writer.set(SIDE_PANEL_KEY, Value::Bool(open));
        }
    }

    /// Wait for queued writes to reach storage.
    pub async fn shutdown(self) {
        self.writer.shutdown().await;
    }
}

async fn read_flag(store: &dyn KeyValueStore, key: &str) -> bool {
    match store.get(key).await {
        Ok(value) => value.and_then(|v| v.as_bool()).unwrap_or(false),
        Err(e) => {
            warn!(%key, "could not read preference: {e}");
            false
        }
    }
}
