//! Key-value storage port for persisted gallery and preference state.

use std::future::Future;
use std::pin::Pin;

use crate::error::PersistenceError;

/// Boxed future type returned by [`KeyValueStore`] methods.
pub type StorageFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, PersistenceError>> + Send + 'a>>;

/// Asynchronous local key-value storage holding JSON values.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageFuture<'_, Option<serde_json::Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: serde_json::Value) -> StorageFuture<'_, ()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageFuture<'_, ()>;
}
