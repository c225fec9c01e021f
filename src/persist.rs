//! Write-behind persistence: mutations are queued and applied in order by a
//! background task, so callers never wait on storage.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::ports::KeyValueStore;

#[derive(Debug)]
enum Write {
    Set(String, Value),
    Remove(String),
}

/// Handle to a background writer task.
///
/// After the first failed write the task stops touching storage for the rest
/// of the session; state then lives in memory only.
#[derive(Debug)]
pub struct WriteBehind {
    tx: mpsc::UnboundedSender<Write>,
    task: JoinHandle<()>,
}

impl WriteBehind {
    /// Spawn a writer for `store`. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_writer(store, rx));
        Self { tx, task }
    }

    /// Queue `value` to be stored under `key`.
    pub fn set(&self, key: &str, value: Value) {
        self.send(Write::Set(key.to_string(), value));
    }

    /// Queue removal of `key`.
    pub fn remove(&self, key: &str) {
        self.send(Write::Remove(key.to_string()));
    }

    fn send(&self, write: Write) {
        if self.tx.send(write).is_err() {
            warn!("storage writer has stopped; change kept in memory only");
        }
    }

    /// Wait for every queued write to be applied.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            warn!("storage writer task failed: {e}");
        }
    }
}

async fn run_writer(store: Arc<dyn KeyValueStore>, mut rx: mpsc::UnboundedReceiver<Write>) {
    let mut disabled = false;
    while let Some(write) = rx.recv().await {
        if disabled {
            continue;
        }
        let (key, result) = match write {
            Write::Set(key, value) => {
                let result = store.set(&key, value).await;
                (key, result)
            }
            Write::Remove(key) => {
                let result = store.remove(&key).await;
                (key, result)
            }
        };
        match result {
            Ok(()) => debug!(%key, "persisted"),
            Err(e) => {
                warn!(%key, "persisting failed, continuing in memory only: {e}");
                disabled = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::error::PersistenceError;
    use crate::ports::storage::StorageFuture;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn writes_apply_in_order() {
        let store = Arc::new(MemoryStore::new());
        let writer = WriteBehind::spawn(store.clone());
        writer.set("k", json!(1));
        writer.set("k", json!(2));
        writer.remove("k");
        writer.set("k", json!(3));
        writer.shutdown().await;

        assert_eq!(store.get("k").await.unwrap(), Some(json!(3)));
    }

    /// Fails every write and counts attempts.
    #[derive(Default)]
    struct BrokenStore {
        attempts: AtomicUsize,
    }

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> StorageFuture<'_, Option<Value>> {
            Box::pin(std::future::ready(Ok::<_, PersistenceError>(None)))
        }

        fn set(&self, _key: &str, _value: Value) -> StorageFuture<'_, ()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let err = PersistenceError::Io(std::io::Error::other("disk full"));
            Box::pin(std::future::ready(Err::<(), _>(err)))
        }

        fn remove(&self, key: &str) -> StorageFuture<'_, ()> {
            self.set(key, Value::Null)
        }
    }

    #[tokio::test]
    async fn failure_disables_further_writes() {
        let store = Arc::new(BrokenStore::default());
        let writer = WriteBehind::spawn(store.clone());
        writer.set("a", json!(1));
        writer.set("b", json!(2));
        writer.remove("c");
        writer.shutdown().await;

        assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
    }
}
