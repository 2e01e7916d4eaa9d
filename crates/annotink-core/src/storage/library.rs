//! The list of named, saved canvases kept under one storage key.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::assets::{AssetHost, UploadError, decode_data_url, is_data_url};
use crate::snapshot::{DocumentSnapshot, now_millis};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage key holding the JSON array of saved canvases.
pub const SAVED_CANVASES_KEY: &str = "recentlySavedCanvases";

/// A named snapshot with a preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCanvas {
    pub id: Uuid,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Preview image reference. Falls back to the background on save.
    #[serde(rename = "previewImageData")]
    pub preview: Option<String>,
    pub data: DocumentSnapshot,
    /// False when the background still points at local-only data because
    /// publishing it to the asset host failed or was not attempted.
    pub synced: bool,
}

/// Result of a successful save.
#[derive(Debug)]
pub struct SaveOutcome {
    pub id: Uuid,
    /// Set when the background upload failed and the canvas was saved with
    /// its original image reference.
    pub upload_error: Option<UploadError>,
}

/// Saved canvases, loaded once and written back whole on every change.
///
/// The in-memory list only changes after the durable write succeeded, so
/// both always agree. Mutating methods take `&mut self`, which keeps two
/// saves from interleaving.
pub struct SavedCanvasLibrary<S: KeyValueStore> {
    store: S,
    entries: Vec<SavedCanvas>,
}

impl<S: KeyValueStore> SavedCanvasLibrary<S> {
    /// Read the saved list from `store`. A missing key is an empty list;
    /// unreadable JSON is logged and treated as empty.
    pub async fn open(store: S) -> StorageResult<Self> {
        let entries = match store.get(SAVED_CANVASES_KEY).await? {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable saved canvases: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        log::info!("Loaded {} saved canvases", entries.len());
        Ok(Self { store, entries })
    }

    /// Saved canvases, oldest first.
    pub fn list_saved(&self) -> &[SavedCanvas] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&SavedCanvas> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save `snapshot` under `name`. Without an explicit `preview` the
    /// (possibly uploaded) background reference is used.
    ///
    /// With an asset host, an inline background is uploaded first and the
    /// returned URL replaces it. An upload failure does not abort the save:
    /// the canvas is stored with its original reference, `synced = false`,
    /// and the error is reported in the outcome.
    pub async fn save(
        &mut self,
        mut snapshot: DocumentSnapshot,
        name: impl Into<String>,
        preview: Option<String>,
        host: Option<&dyn AssetHost>,
    ) -> StorageResult<SaveOutcome> {
        let created_at = now_millis();
        let mut upload_error = None;
        let mut synced = true;

        if let Some(background) = snapshot.background_image.clone().filter(|bg| is_data_url(bg)) {
            match host {
                Some(host) => match publish_background(host, &background, created_at).await {
                    Ok(url) => {
                        log::info!("Background published to {}", url);
                        snapshot.background_image = Some(url);
                    }
                    Err(e) => {
                        log::warn!("Background upload failed, saving locally: {}", e);
                        synced = false;
                        upload_error = Some(e);
                    }
                },
                None => synced = false,
            }
        }

        let entry = SavedCanvas {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at,
            preview: preview.or_else(|| snapshot.background_image.clone()),
            data: snapshot,
            synced,
        };
        let id = entry.id;

        let mut updated = self.entries.clone();
        updated.push(entry);
        self.persist(&updated).await?;
        self.entries = updated;

        log::info!("Saved canvas {} ({} total)", id, self.entries.len());
        Ok(SaveOutcome { id, upload_error })
    }

    /// Remove the entry at `index` from memory and the durable store.
    pub async fn delete(&mut self, index: usize) -> StorageResult<SavedCanvas> {
        if index >= self.entries.len() {
            return Err(StorageError::NotFound(format!("saved canvas #{}", index)));
        }
        let mut updated = self.entries.clone();
        let removed = updated.remove(index);
        self.persist(&updated).await?;
        self.entries = updated;

        log::info!("Deleted saved canvas {}", removed.id);
        Ok(removed)
    }

    async fn persist(&self, entries: &[SavedCanvas]) -> StorageResult<()> {
        let json = serde_json::to_string(entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store
            .set(SAVED_CANVASES_KEY, &json)
            .await
            .inspect_err(|e| log::error!("Failed to persist saved canvases: {}", e))
    }
}

async fn publish_background(
    host: &dyn AssetHost,
    background: &str,
    created_at: u64,
) -> Result<String, UploadError> {
    let (_mime, bytes) = decode_data_url(background)
        .map_err(|e| UploadError::Rejected(format!("background is not uploadable: {}", e)))?;
    let title = format!("Background_{}", created_at);
    host.upload(bytes, &title).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::test_support::png_data_url;
    use crate::canvas::CanvasSize;
    use crate::storage::{BoxFuture, MemoryStore};
    use pollster::block_on;
    use std::cell::RefCell;

    fn snapshot(background: Option<String>) -> DocumentSnapshot {
        DocumentSnapshot {
            version: "1.0".to_string(),
            timestamp: 1,
            canvas_size: CanvasSize::default(),
            background_image: background,
            objects: Vec::new(),
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        titles: RefCell<Vec<String>>,
        fail: bool,
    }

    impl AssetHost for RecordingHost {
        fn upload<'a>(
            &'a self,
            bytes: Vec<u8>,
            title: &'a str,
        ) -> BoxFuture<'a, Result<String, UploadError>> {
            Box::pin(async move {
                if self.fail {
                    return Err(UploadError::Transport("connection reset".to_string()));
                }
                assert!(!bytes.is_empty());
                self.titles.borrow_mut().push(title.to_string());
                Ok("https://media.example.com/bg.png".to_string())
            })
        }
    }

    #[test]
    fn test_open_empty_and_corrupt() {
        let library = block_on(SavedCanvasLibrary::open(MemoryStore::new())).unwrap();
        assert!(library.is_empty());

        let store = MemoryStore::new();
        block_on(store.set(SAVED_CANVASES_KEY, "{not json")).unwrap();
        let library = block_on(SavedCanvasLibrary::open(store)).unwrap();
        assert!(library.is_empty());
    }

    #[test]
    fn test_save_persists_whole_list() {
        let mut library = block_on(SavedCanvasLibrary::open(MemoryStore::new())).unwrap();
        block_on(library.save(snapshot(None), "First", None, None)).unwrap();
        block_on(library.save(snapshot(None), "Second", None, None)).unwrap();

        let stored = library.store().peek(SAVED_CANVASES_KEY).unwrap();
        let parsed: Vec<SavedCanvas> = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed, library.list_saved());
        assert_eq!(parsed[1].name, "Second");
        assert!(parsed[0].synced);
        assert!(stored.contains("\"createdAt\""));
    }

    #[test]
    fn test_reopen_sees_saved_entries() {
        let mut library = block_on(SavedCanvasLibrary::open(MemoryStore::new())).unwrap();
        block_on(library.save(snapshot(None), "Kept", None, None)).unwrap();
        let json = library.store().peek(SAVED_CANVASES_KEY).unwrap();

        let store = MemoryStore::new();
        block_on(store.set(SAVED_CANVASES_KEY, &json)).unwrap();
        let reopened = block_on(SavedCanvasLibrary::open(store)).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(0).map(|c| c.name.as_str()), Some("Kept"));
    }

    #[test]
    fn test_upload_replaces_background() {
        let host = RecordingHost::default();
        let mut library = block_on(SavedCanvasLibrary::open(MemoryStore::new())).unwrap();
        let background = snapshot(Some(png_data_url(2, 2)));
        let outcome = block_on(library.save(background, "Hosted", None, Some(&host))).unwrap();

        assert!(outcome.upload_error.is_none());
        let saved = &library.list_saved()[0];
        assert_eq!(saved.id, outcome.id);
        assert!(saved.synced);
        assert_eq!(saved.preview.as_deref(), Some("https://media.example.com/bg.png"));
        assert_eq!(saved.data.background_image, saved.preview);
        assert!(host.titles.borrow()[0].starts_with("Background_"));
    }

    #[test]
    fn test_upload_failure_saves_locally() {
        let host = RecordingHost {
            fail: true,
            ..RecordingHost::default()
        };
        let background = png_data_url(2, 2);
        let mut library = block_on(SavedCanvasLibrary::open(MemoryStore::new())).unwrap();
        let data = snapshot(Some(background.clone()));
        let outcome = block_on(library.save(data, "Offline", None, Some(&host))).unwrap();

        assert!(matches!(outcome.upload_error, Some(UploadError::Transport(_))));
        let saved = &library.list_saved()[0];
        assert!(!saved.synced);
        assert_eq!(saved.data.background_image.as_deref(), Some(background.as_str()));
    }

    #[test]
    fn test_explicit_preview_wins_over_background() {
        let host = RecordingHost::default();
        let mut library = block_on(SavedCanvasLibrary::open(MemoryStore::new())).unwrap();
        let thumbnail = png_data_url(1, 1);
        let data = snapshot(Some(png_data_url(2, 2)));
        block_on(library.save(data, "Thumb", Some(thumbnail.clone()), Some(&host))).unwrap();

        let saved = &library.list_saved()[0];
        assert_eq!(saved.preview.as_deref(), Some(thumbnail.as_str()));
        assert_eq!(
            saved.data.background_image.as_deref(),
            Some("https://media.example.com/bg.png")
        );

        let stored = library.store().peek(SAVED_CANVASES_KEY).unwrap();
        assert!(stored.contains("\"previewImageData\""));
    }

    #[test]
    fn test_remote_background_is_not_reuploaded() {
        let host = RecordingHost::default();
        let mut library = block_on(SavedCanvasLibrary::open(MemoryStore::new())).unwrap();
        let remote = Some("https://media.example.com/old.png".to_string());
        block_on(library.save(snapshot(remote), "Remote", None, Some(&host))).unwrap();
        assert!(host.titles.borrow().is_empty());
        assert!(library.list_saved()[0].synced);
    }

    #[test]
    fn test_quota_failure_leaves_list_intact() {
        let mut library = block_on(SavedCanvasLibrary::open(MemoryStore::with_quota(600))).unwrap();
        block_on(library.save(snapshot(None), "Small", None, None)).unwrap();
        let before = library.store().peek(SAVED_CANVASES_KEY);

        let big = Some(format!("https://media.example.com/{}", "x".repeat(1000)));
        let err = block_on(library.save(snapshot(big), "Too big", None, None)).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded));
        assert_eq!(library.len(), 1);
        assert_eq!(library.store().peek(SAVED_CANVASES_KEY), before);
    }

    #[test]
    fn test_delete() {
        let mut library = block_on(SavedCanvasLibrary::open(MemoryStore::new())).unwrap();
        block_on(library.save(snapshot(None), "A", None, None)).unwrap();
        block_on(library.save(snapshot(None), "B", None, None)).unwrap();

        let removed = block_on(library.delete(0)).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(library.len(), 1);
        let stored: Vec<SavedCanvas> =
            serde_json::from_str(&library.store().peek(SAVED_CANVASES_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 1);

        assert!(matches!(
            block_on(library.delete(5)),
            Err(StorageError::NotFound(_))
        ));
    }
}
