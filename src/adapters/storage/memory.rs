//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::PersistenceError;
use crate::ports::storage::{KeyValueStore, StorageFuture};

/// Keeps values for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut HashMap<String, Value>) -> T) -> T {
        let mut guard = self.values.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageFuture<'_, Option<Value>> {
        let value = self.with_values(|v| v.get(key).cloned());
        Box::pin(std::future::ready(Ok::<_, PersistenceError>(value)))
    }

    fn set(&self, key: &str, value: Value) -> StorageFuture<'_, ()> {
        self.with_values(|v| v.insert(key.to_string(), value));
        Box::pin(std::future::ready(Ok::<_, PersistenceError>(())))
    }

    fn remove(&self, key: &str) -> StorageFuture<'_, ()> {
        self.with_values(|v| v.remove(key));
        Box::pin(std::future::ready(Ok::<_, PersistenceError>(())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);
        store.set("a", json!({"x": 1})).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(json!({"x": 1})));
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
