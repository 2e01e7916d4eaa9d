//! annotink Core Library
//!
//! Platform-agnostic object model, edit history and persistence for the
//! annotink image annotator. Rendering is left to the host, which talks to
//! the core through [`render::RenderSync`] and [`render::Rasterizer`].

pub mod assets;
pub mod canvas;
pub mod editor;
pub mod export;
pub mod history;
pub mod input;
pub mod render;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod snapshot;
pub mod storage;
pub mod template;
pub mod viewport;
pub mod widget;

pub use assets::{
    AssetHost, AssetHostConfig, DataUrlLoader, DecodeError, DecodedImage, ImageLoader, UploadError,
};
pub use canvas::{CanvasDocument, CanvasSize};
pub use editor::{EditorConfig, EditorError, EditorResult, EditorState};
pub use export::{ExportError, PngExport, export_png};
pub use history::History;
pub use input::{ClickTarget, Key, KeyPress, Modifiers};
pub use render::{Rasterizer, RenderSync};
pub use selection::{InlineEdit, Selection};
pub use shapes::{ObjectId, PrimitiveKind, SerializableColor, Shape, ShapeKind, Transform};
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use snapshot::{DocumentSnapshot, LoadWarning, LoadedDocument, deserialize, serialize};
pub use storage::{KeyValueStore, SavedCanvas, SavedCanvasLibrary, StorageError};
pub use template::{CanvasPreset, LoadedTemplate, Template, placeholder_catalog};
pub use viewport::Viewport;
pub use widget::{EditingKind, Handle, HandleKind, HandleShape, WidgetState};
