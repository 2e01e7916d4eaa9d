//! Editor state and the canvas mutation API.
//!
//! Every mutating operation builds the new object sequence on the document
//! and then commits it to history exactly once. View state (selection,
//! viewport) never commits, unless `commit_on_select` asks for it.

use crate::assets::DecodedImage;
use crate::canvas::{CanvasDocument, CanvasSize};
use crate::export::{ExportError, PngExport, export_png};
use crate::history::History;
use crate::input::{ClickTarget, KeyPress};
use crate::render::{Rasterizer, RenderSync};
use crate::selection::{InlineEdit, Selection};
use crate::shapes::{
    Image, ObjectId, PrimitiveKind, SerializableColor, Shape, Text, TextAlign, Transform,
};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::snapshot::{DocumentSnapshot, LoadWarning, LoadedDocument, serialize};
use crate::template::{CanvasPreset, LoadedTemplate};
use crate::viewport::Viewport;
use crate::widget::{HANDLE_HIT_TOLERANCE, Handle, HandleKind, handles_for, hit_test_handle};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Click tolerance in screen pixels.
pub const CLICK_TOLERANCE: f64 = 4.0;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("No object is selected")]
    NoSelection,
    #[error("Object {0} not found")]
    NotFound(ObjectId),
    #[error("Object {0} is not a text object")]
    NotText(ObjectId),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Editor behavior switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Push a history entry when a click only changes the selection.
    pub commit_on_select: bool,
    /// `set_fill` also recolors the stroke of the selected object.
    pub fill_sets_stroke: bool,
    /// Maximum number of history entries. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Color used for new closed shapes until `set_fill` changes it.
    pub initial_color: SerializableColor,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            commit_on_select: false,
            fill_sets_stroke: true,
            history_limit: None,
            initial_color: SerializableColor::black(),
        }
    }
}

/// Everything one editing session owns.
#[derive(Debug, Clone)]
pub struct EditorState {
    document: CanvasDocument,
    history: History,
    selection: Selection,
    /// Zoom and pan. Not part of the document.
    pub viewport: Viewport,
    config: EditorConfig,
    current_color: SerializableColor,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    /// An empty document with the empty sequence as the first history entry.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(CanvasDocument::new(), config)
    }

    /// Start editing `document`; its objects become the first history entry.
    pub fn with_document(document: CanvasDocument, config: EditorConfig) -> Self {
        let history = History::seeded(document.objects().to_vec(), config.history_limit);
        Self {
            document,
            history,
            selection: Selection::new(),
            viewport: Viewport::new(),
            current_color: config.initial_color,
            config,
        }
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn objects(&self) -> &[Shape] {
        self.document.objects()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selection.selected()
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection.selected().and_then(|id| self.document.get(id))
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Color new closed shapes are filled with.
    pub fn current_color(&self) -> SerializableColor {
        self.current_color
    }

    fn commit(&mut self) {
        self.history.commit(self.document.objects().to_vec());
    }

    fn add(&mut self, shape: Shape) -> ObjectId {
        let id = shape.id();
        log::debug!("Adding {:?} {}", shape.kind(), id);
        self.document.push(shape);
        self.commit();
        id
    }

    // --- Creation ---

    /// Add a shape with its picker defaults.
    pub fn add_shape(&mut self, kind: PrimitiveKind) -> ObjectId {
        self.add(kind.instantiate(self.current_color))
    }

    /// Add a default text object.
    pub fn add_text(&mut self) -> ObjectId {
        self.add(Shape::Text(Text::default_text()))
    }

    /// Add a placeholder tag. An empty tag adds nothing.
    pub fn add_placeholder(&mut self, tag: &str) -> Option<ObjectId> {
        if tag.is_empty() {
            return None;
        }
        Some(self.add(Shape::Text(Text::placeholder(tag))))
    }

    /// Add an image overlay above everything else.
    pub fn add_overlay_image(&mut self, decoded: &DecodedImage) -> ObjectId {
        self.add(Shape::Image(Image::overlay(decoded)))
    }

    // --- Selection-dependent mutations ---

    /// Remove the selected object and clear the selection.
    pub fn delete_selected(&mut self) -> EditorResult<Shape> {
        let id = self.selection.selected().ok_or(EditorError::NoSelection)?;
        self.selection.clear();
        let removed = self.document.remove(id).ok_or(EditorError::NotFound(id))?;
        log::debug!("Deleted {}", id);
        self.commit();
        Ok(removed)
    }

    /// Swap the selected object with the one above it. Returns whether
    /// anything moved.
    pub fn move_selected_forward(&mut self) -> bool {
        match self.selection.selected() {
            Some(id) if self.document.bring_forward(id) => {
                self.commit();
                true
            }
            _ => false,
        }
    }

    /// Swap the selected object with the one below it. Returns whether
    /// anything moved.
    pub fn move_selected_backward(&mut self) -> bool {
        match self.selection.selected() {
            Some(id) if self.document.send_backward(id) => {
                self.commit();
                true
            }
            _ => false,
        }
    }

    /// Remember `color` for new shapes and recolor the selected object.
    pub fn set_fill(&mut self, color: SerializableColor) {
        self.current_color = color;
        let Some(id) = self.selection.selected() else {
            return;
        };
        let fill_sets_stroke = self.config.fill_sets_stroke;
        if let Some(shape) = self.document.get_mut(id) {
            let style = shape.style_mut();
            style.fill = Some(color);
            if fill_sets_stroke {
                style.stroke = Some(color);
            }
            self.commit();
        }
    }

    /// Commit the end of a drag or resize of the selected object.
    pub fn transform_selected(&mut self, transform: Transform) -> EditorResult<()> {
        let id = self.selection.selected().ok_or(EditorError::NoSelection)?;
        self.transform_object(id, transform)
    }

    /// Commit the end of a drag or resize of `id`.
    pub fn transform_object(&mut self, id: ObjectId, transform: Transform) -> EditorResult<()> {
        let shape = self.document.get_mut(id).ok_or(EditorError::NotFound(id))?;
        shape.apply_transform(transform);
        self.commit();
        Ok(())
    }

    /// Pull the live transform of the selected object from the render layer
    /// at the end of a gesture. Returns false when the render layer has
    /// nothing newer than the committed state.
    pub fn sync_from_renderer(&mut self, renderer: &dyn RenderSync) -> EditorResult<bool> {
        let id = self.selection.selected().ok_or(EditorError::NoSelection)?;
        match renderer.live_transform(id) {
            Some(transform) => self.transform_object(id, transform).map(|()| true),
            None => Ok(false),
        }
    }

    /// Replace the content of text object `id`. Anything else is ignored.
    pub fn set_text_content(&mut self, id: ObjectId, content: impl Into<String>) -> bool {
        match self.document.get_mut(id).and_then(Shape::as_text_mut) {
            Some(text) => {
                text.content = content.into();
                self.commit();
                true
            }
            None => {
                log::debug!("set_text_content: {} is not a text object", id);
                false
            }
        }
    }

    // --- Text formatting ---

    fn update_selected_text(&mut self, update: impl FnOnce(&mut Text)) -> bool {
        let Some(id) = self.selection.selected() else {
            return false;
        };
        match self.document.get_mut(id).and_then(Shape::as_text_mut) {
            Some(text) => {
                update(text);
                self.commit();
                true
            }
            None => false,
        }
    }

    pub fn toggle_bold(&mut self) -> bool {
        self.update_selected_text(|text| text.bold = !text.bold)
    }

    pub fn toggle_italic(&mut self) -> bool {
        self.update_selected_text(|text| text.italic = !text.italic)
    }

    pub fn toggle_underline(&mut self) -> bool {
        self.update_selected_text(|text| text.underline = !text.underline)
    }

    pub fn set_text_align(&mut self, align: TextAlign) -> bool {
        self.update_selected_text(|text| text.align = align)
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) -> bool {
        let family = family.into();
        self.update_selected_text(|text| text.font_family = family)
    }

    pub fn set_font_size(&mut self, size: f64) -> bool {
        if !(size.is_finite() && size > 0.0) {
            return false;
        }
        self.update_selected_text(|text| text.font_size = size)
    }

    // --- History ---

    /// Step back one entry. Returns false at the start of history.
    pub fn undo(&mut self) -> bool {
        let Some(objects) = self.history.undo().map(<[Shape]>::to_vec) else {
            return false;
        };
        self.restore(objects);
        true
    }

    /// Step forward one entry. Returns false at the end of history.
    pub fn redo(&mut self) -> bool {
        let Some(objects) = self.history.redo().map(<[Shape]>::to_vec) else {
            return false;
        };
        self.restore(objects);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn restore(&mut self, objects: Vec<Shape>) {
        self.document.replace_objects(objects);
        if let Some(id) = self.selection.selected() {
            if !self.document.contains(id) {
                self.selection.forget(id);
            }
        }
    }

    // --- Document-level operations ---

    /// Change the canvas size and reset zoom to 100%.
    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        log::info!("Resizing canvas to {}x{}", width, height);
        self.document.size = CanvasSize::new(width, height);
        self.viewport.reset_zoom();
    }

    pub fn apply_preset(&mut self, preset: CanvasPreset) {
        let size = preset.size();
        self.resize_canvas(size.width, size.height);
    }

    pub fn set_background(&mut self, image: DecodedImage) {
        self.document.background = Some(image);
    }

    pub fn remove_background(&mut self) -> Option<DecodedImage> {
        self.document.background.take()
    }

    /// Publish a loaded snapshot as one history entry. Selection and any
    /// inline edit are cleared. The load warnings are handed back.
    pub fn replace_document(&mut self, loaded: LoadedDocument) -> Vec<LoadWarning> {
        let LoadedDocument { document, warnings } = loaded;
        log::info!("Replacing document ({} objects)", document.len());
        self.document = document;
        self.selection.clear();
        self.commit();
        warnings
    }

    /// Replace the background and objects with a loaded template as one
    /// history entry. Selection and any inline edit are cleared.
    pub fn apply_template(&mut self, template: LoadedTemplate) {
        let LoadedTemplate {
            name,
            background,
            objects,
        } = template;
        log::info!("Applying template {} ({} elements)", name, objects.len());
        self.document.background = Some(background);
        self.document.replace_objects(objects);
        self.selection.clear();
        self.commit();
    }

    /// Serialize the document, preferring live transforms when a render
    /// layer is given.
    pub fn snapshot(&self, renderer: Option<&dyn RenderSync>) -> DocumentSnapshot {
        serialize(&self.document, renderer)
    }

    /// Rasterize and PNG-encode the document.
    pub fn export_png(&self, rasterizer: &dyn Rasterizer) -> EditorResult<PngExport> {
        Ok(export_png(&self.document, rasterizer)?)
    }

    // --- Interaction ---

    /// React to a key press. Returns the action that was carried out.
    pub fn handle_key(&mut self, press: &KeyPress) -> Option<ShortcutAction> {
        let action = ShortcutRegistry::resolve(press, self.selection.is_editing())?;
        let done = match action {
            ShortcutAction::DeleteSelection => self
                .delete_selected()
                .inspect_err(|e| log::debug!("Delete shortcut ignored: {}", e))
                .is_ok(),
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::CommitTextEdit => self.commit_text_edit(),
        };
        done.then_some(action)
    }

    /// Apply a single click resolved by the render layer.
    pub fn click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::Empty | ClickTarget::Background => self.selection.clear(),
            ClickTarget::Object(id) if self.document.contains(id) => {
                self.selection.select(id);
                if self.config.commit_on_select {
                    self.commit();
                }
            }
            ClickTarget::Object(id) => log::debug!("Click on unknown object {}", id),
        }
    }

    /// Resolve a screen point to a click target and apply it.
    pub fn click_at(&mut self, screen_point: Point) -> ClickTarget {
        let target = self.target_at(screen_point);
        self.click(target);
        target
    }

    /// What lies under `screen_point`.
    pub fn target_at(&self, screen_point: Point) -> ClickTarget {
        let world = self.viewport.screen_to_world(screen_point);
        let tolerance = CLICK_TOLERANCE / self.viewport.scale;
        if let Some(id) = self.document.object_at(world, tolerance) {
            ClickTarget::Object(id)
        } else if self.document.background.is_some()
            && self.document.size.as_rect().contains(world)
        {
            ClickTarget::Background
        } else {
            ClickTarget::Empty
        }
    }

    /// Open an inline edit on text object `id`.
    pub fn double_click(&mut self, id: ObjectId) -> EditorResult<()> {
        let shape = self.document.get(id).ok_or(EditorError::NotFound(id))?;
        let text = shape.as_text().ok_or(EditorError::NotText(id))?;
        self.selection.begin_edit(InlineEdit::for_text(text));
        Ok(())
    }

    /// Current inline edit, if any.
    pub fn inline_edit(&self) -> Option<&InlineEdit> {
        self.selection.editing()
    }

    /// Update the value of the inline edit.
    pub fn set_edit_value(&mut self, value: impl Into<String>) -> bool {
        self.selection.set_edit_value(value)
    }

    /// Write the inline edit back into the document. Returns false when no
    /// edit was open.
    pub fn commit_text_edit(&mut self) -> bool {
        match self.selection.take_edit() {
            Some(edit) => {
                self.set_text_content(edit.id, edit.value);
                true
            }
            None => false,
        }
    }

    /// Close the inline edit without touching the document.
    pub fn cancel_text_edit(&mut self) -> bool {
        self.selection.take_edit().is_some()
    }

    /// Whether the render layer should draw `id`.
    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.selection.is_visible(id)
    }

    /// Transform handles of the selected object. Empty while editing.
    pub fn handles(&self) -> Vec<Handle> {
        match self.selection.selected() {
            Some(id) if self.selection.widget_state(id).shows_handles() => {
                self.document.get(id).map(handles_for).unwrap_or_default()
            }
            _ => Vec::new(),
        }
    }

    /// The handle of the selected object under `screen_point`.
    pub fn handle_at(&self, screen_point: Point) -> Option<HandleKind> {
        let shape = self.selected_shape()?;
        if !self.selection.widget_state(shape.id()).shows_handles() {
            return None;
        }
        let world = self.viewport.screen_to_world(screen_point);
        hit_test_handle(shape, world, HANDLE_HIT_TOLERANCE / self.viewport.scale)
    }
}
