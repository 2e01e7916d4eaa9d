//! Browser `window.localStorage` implementation for WASM.

use super::{BoxFuture, KeyValueStore, StorageError, StorageResult};
use web_sys::Storage;

/// Key-value store backed by the page's local storage.
#[derive(Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> StorageResult<Storage> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            Self::storage()?
                .get_item(&key)
                .map_err(|e| StorageError::Other(format!("getItem failed: {:?}", e)))
        })
    }

    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let value = value.to_string();
        Box::pin(async move {
            // Browsers throw a QuotaExceededError DOMException when full;
            // any setItem failure is treated as such.
            Self::storage()?.set_item(&key, &value).map_err(|e| {
                log::error!("localStorage.setItem failed: {:?}", e);
                StorageError::QuotaExceeded
            })
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            Self::storage()?
                .remove_item(&key)
                .map_err(|e| StorageError::Other(format!("removeItem failed: {:?}", e)))
        })
    }
}
