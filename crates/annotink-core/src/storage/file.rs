//! File-based storage implementation for native platforms.

use super::{BoxFuture, KeyValueStore, StorageError, StorageResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File-based key-value store for native platforms.
///
/// Each key is one JSON file in the base directory. Writes go to a
/// temporary sibling first and are renamed into place, so a failed write
/// never leaves a half-written value behind.
pub struct FileStore {
    /// Base directory for stored values.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/annotink/canvases/`
    /// On Windows: `%LOCALAPPDATA%\annotink\canvases\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        let path = base.join("annotink").join("canvases");
        Self::new(path)
    }

    /// Get the file path for a key.
    fn value_path(&self, key: &str) -> PathBuf {
        // Sanitize key to be safe for filenames
        let safe_key: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn write_error(path: &Path, e: io::Error) -> StorageError {
    match e.kind() {
        io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => StorageError::QuotaExceeded,
        _ => StorageError::Io(format!("Failed to write {}: {}", path.display(), e)),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let path = self.value_path(key);
        Box::pin(async move {
            match fs::read_to_string(&path) {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(StorageError::Io(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))),
            }
        })
    }

    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.value_path(key);
        let tmp = path.with_extension("json.tmp");
        let value = value.to_string();
        Box::pin(async move {
            if let Err(e) = fs::write(&tmp, value) {
                let _ = fs::remove_file(&tmp);
                return Err(write_error(&tmp, e));
            }
            fs::rename(&tmp, &path).map_err(|e| write_error(&path, e))
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.value_path(key);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::Io(format!(
                    "Failed to delete {}: {}",
                    path.display(),
                    e
                ))),
            }
        })
    }
}
