//! JSON-file key-value store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::PersistenceError;
use crate::ports::storage::{KeyValueStore, StorageFuture};

/// Stores every key in one JSON object on disk.
///
/// Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by `<dir>/storage.json`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("storage.json"))
    }

    /// Store backed by the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Map<String, Value>, PersistenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, doc: &Map<String, Value>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(doc)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn get_value(&self, key: String) -> Result<Option<Value>, PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;
        Ok(doc.remove(&key))
    }

    async fn set_value(&self, key: String, value: Value) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        // An unreadable document is replaced rather than blocking every write.
        let mut doc = self.read_document().await.unwrap_or_default();
        doc.insert(key, value);
        self.write_document(&doc).await
    }

    async fn remove_value(&self, key: String) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await.unwrap_or_default();
        if doc.remove(&key).is_some() {
            self.write_document(&doc).await?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageFuture<'_, Option<Value>> {
        Box::pin(self.get_value(key.to_string()))
    }

    fn set(&self, key: &str, value: Value) -> StorageFuture<'_, ()> {
        Box::pin(self.set_value(key.to_string(), value))
    }

    fn remove(&self, key: &str) -> StorageFuture<'_, ()> {
        Box::pin(self.remove_value(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert_eq!(store.get("savedCodes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(&dir.path().join("nested"));

        store.set("isDark", json!(true)).await.unwrap();
        store.set("savedCodes", json!([1, 2])).await.unwrap();
        assert_eq!(store.get("isDark").await.unwrap(), Some(json!(true)));

        store.remove("savedCodes").await.unwrap();
        assert_eq!(store.get("savedCodes").await.unwrap(), None);
        assert_eq!(store.get("isDark").await.unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn values_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::in_dir(dir.path()).set("k", json!("v")).await.unwrap();
        let reopened = FileStore::in_dir(dir.path());
        assert_eq!(reopened.get("k").await.unwrap(), Some(json!("v")));
    }

    #[tokio::test]
    async fn corrupt_document_fails_get_but_not_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.get("k").await, Err(PersistenceError::Serialize(_))));
        store.set("k", json!(1)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn removing_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.remove("nothing").await.unwrap();
        assert!(!store.path().exists());
    }
}
