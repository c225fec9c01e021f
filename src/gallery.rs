//! Saved-code gallery with write-through persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::IndexError;
use crate::model::SymbolKind;
use crate::persist::WriteBehind;
use crate::ports::{KeyValueStore, RenderedImage};

/// Storage key holding the saved items.
pub const SAVED_CODES_KEY: &str = "savedCodes";

/// A generated symbol kept in the gallery. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    content: String,
    kind: SymbolKind,
    image: RenderedImage,
    created_at: DateTime<Utc>,
}

impl SavedItem {
    /// Create an item stamped with the current time.
    #[must_use]
    pub fn new(kind: SymbolKind, content: impl Into<String>, image: RenderedImage) -> Self {
        Self::with_timestamp(kind, content, image, Utc::now())
    }

    /// Create an item with an explicit creation time.
    #[must_use]
    pub fn with_timestamp(
        kind: SymbolKind,
        content: impl Into<String>,
        image: RenderedImage,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self { content: content.into(), kind, image, created_at }
    }

    /// The encoded text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// QR or barcode.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// The rendered image.
    #[must_use]
    pub fn image(&self) -> &RenderedImage {
        &self.image
    }

    /// When the item was saved.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered collection of saved items, oldest first.
///
/// Every mutation queues a write of the full collection; see [`WriteBehind`].
#[derive(Debug)]
pub struct GalleryStore {
    items: Vec<SavedItem>,
    writer: WriteBehind,
}

impl GalleryStore {
    /// Load the gallery from `store`.
    ///
    /// Missing, unreadable or malformed data yields an empty gallery.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match store.get(SAVED_CODES_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("ignoring malformed saved codes: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("could not read saved codes, starting empty: {e}");
                Vec::new()
            }
        };
        info!(count = items.len(), "gallery loaded");
        Self { items, writer: WriteBehind::spawn(store) }
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[SavedItem] {
        &self.items
    }

    /// Number of saved items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the gallery is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SavedItem> {
        self.items.get(index)
    }

    /// Add an item at the end. Duplicates are kept.
    pub fn append(&mut self, item: SavedItem) {
        debug!(kind = %item.kind, "appending to gallery");
        self.items.push(item);
        self.persist();
    }

    /// Remove the item at `index`, shifting later items left.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if `index` is out of range; the gallery is left
    /// unchanged.
    pub fn remove_at(&mut self, index: usize) -> Result<SavedItem, IndexError> {
        if index >= self.items.len() {
            return Err(IndexError { index, len: self.items.len() });
        }
        let removed = self.items.remove(index);
        self.persist();
        Ok(removed)
    }

    /// Remove every item and delete the persisted key.
    pub fn clear(&mut self) {
        self.items.clear();
        self.writer.remove(SAVED_CODES_KEY);
    }

    /// Wait for queued writes to reach storage.
    pub async fn shutdown(self) {
        self.writer.shutdown().await;
    }

    fn persist(&self) {
        match serde_json::to_value(&self.items) {
            Ok(value) => self.writer.set(SAVED_CODES_KEY, value),
            Err(e) => warn!("could not serialize gallery: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{FileStore, MemoryStore};
    use serde_json::json;

    fn item(kind: SymbolKind, content: &str) -> SavedItem {
        SavedItem::new(kind, content, RenderedImage::png(content.as_bytes().to_vec()))
    }

    async fn persisted(store: &MemoryStore) -> Option<Vec<SavedItem>> {
        store
            .get(SAVED_CODES_KEY)
            .await
            .unwrap()
            .map(|v| serde_json::from_value(v).unwrap())
    }

    #[tokio::test]
    async fn starts_empty_without_data() {
        let gallery = GalleryStore::load(Arc::new(MemoryStore::new())).await;
        assert!(gallery.is_empty());
        gallery.shutdown().await;
    }

    #[tokio::test]
    async fn malformed_data_is_treated_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set(SAVED_CODES_KEY, json!({"not": "a list"})).await.unwrap();
        let gallery = GalleryStore::load(store).await;
        assert!(gallery.is_empty());
        gallery.shutdown().await;
    }

    #[tokio::test]
    async fn append_keeps_order_and_duplicates() {
        let mut gallery = GalleryStore::load(Arc::new(MemoryStore::new())).await;
        gallery.append(item(SymbolKind::Qr, "a"));
        gallery.append(item(SymbolKind::Barcode, "b"));
        gallery.append(item(SymbolKind::Qr, "a"));
        let contents: Vec<_> = gallery.items().iter().map(SavedItem::content).collect();
        assert_eq!(contents, ["a", "b", "a"]);
        gallery.shutdown().await;
    }

    #[tokio::test]
    async fn remove_at_shifts_left() {
        let mut gallery = GalleryStore::load(Arc::new(MemoryStore::new())).await;
        for c in ["a", "b", "c"] {
            gallery.append(item(SymbolKind::Qr, c));
        }
        let removed = gallery.remove_at(1).unwrap();
        assert_eq!(removed.content(), "b");
        assert_eq!(gallery.get(1).unwrap().content(), "c");
        gallery.shutdown().await;
    }

    #[tokio::test]
    async fn remove_out_of_range_leaves_items_unchanged() {
        let mut gallery = GalleryStore::load(Arc::new(MemoryStore::new())).await;
        assert_eq!(gallery.remove_at(0), Err(IndexError { index: 0, len: 0 }));

        gallery.append(item(SymbolKind::Qr, "a"));
        let before = gallery.items().to_vec();
        assert_eq!(gallery.remove_at(1), Err(IndexError { index: 1, len: 1 }));
        assert_eq!(gallery.items(), before.as_slice());
        gallery.shutdown().await;
    }

    #[tokio::test]
    async fn persisted_state_tracks_memory() {
        let store = Arc::new(MemoryStore::new());
        let mut gallery = GalleryStore::load(store.clone()).await;
        gallery.append(item(SymbolKind::Qr, "a"));
        gallery.append(item(SymbolKind::Barcode, "b"));
        gallery.remove_at(0).unwrap();
        let expected = gallery.items().to_vec();
        gallery.shutdown().await;

        assert_eq!(persisted(&store).await, Some(expected));
    }

    #[tokio::test]
    async fn clear_removes_persisted_key() {
        let store = Arc::new(MemoryStore::new());
        let mut gallery = GalleryStore::load(store.clone()).await;
        gallery.append(item(SymbolKind::Qr, "a"));
        gallery.clear();
        assert!(gallery.is_empty());
        gallery.shutdown().await;

        assert_eq!(persisted(&store).await, None);
    }

    #[tokio::test]
    async fn reload_after_restart() {
        let dir = tempfile::tempdir().unwrap();
        let saved = item(SymbolKind::Barcode, "ABC-123");

        let mut gallery = GalleryStore::load(Arc::new(FileStore::in_dir(dir.path()))).await;
        gallery.append(saved.clone());
        gallery.shutdown().await;

        let reloaded = GalleryStore::load(Arc::new(FileStore::in_dir(dir.path()))).await;
        assert_eq!(reloaded.items(), [saved]);
        reloaded.shutdown().await;
    }
}
