//! Storage abstraction for saved canvases.

mod library;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use library::{SaveOutcome, SavedCanvas, SavedCanvasLibrary, SAVED_CANVASES_KEY};
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage quota exceeded")]
    QuotaExceeded,
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Durable string key-value store, the shape of browser local storage.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; a missing key is `Ok(None)`.
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete a key. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;
}

/// Durable string key-value store (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait KeyValueStore {
    /// Read a value; a missing key is `Ok(None)`.
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete a key. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;
}
