//! In-memory storage implementation.

use super::{BoxFuture, KeyValueStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
///
/// An optional byte quota (keys plus values) makes writes fail with
/// [`StorageError::QuotaExceeded`] the way a full browser store does.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create a new empty memory store without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes beyond `bytes` in total.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(bytes),
        }
    }

    /// Direct synchronous read, handy for assertions.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            let entries = self.entries.read().map_err(lock_error)?;
            Ok(entries.get(&key).cloned())
        })
    }

    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let value = value.to_string();
        Box::pin(async move {
            let mut entries = self.entries.write().map_err(lock_error)?;
            if let Some(quota) = self.quota {
                let others: usize = entries
                    .iter()
                    .filter(|(k, _)| **k != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum();
                if others + key.len() + value.len() > quota {
                    return Err(StorageError::QuotaExceeded);
                }
            }
            entries.insert(key, value);
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut entries = self.entries.write().map_err(lock_error)?;
            entries.remove(&key);
            Ok(())
        })
    }
}
