//! The single active object and the inline text edit.

use crate::shapes::{ObjectId, SerializableColor, Text};
use crate::viewport::Viewport;
use crate::widget::{EditingKind, WidgetState};
use kurbo::Point;

/// An open inline edit over a text object.
///
/// The text object stays hidden while the edit is open; the host draws an
/// input box from these fields instead.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineEdit {
    pub id: ObjectId,
    /// Current value of the input box.
    pub value: String,
    /// Top-left of the text in canvas coordinates.
    pub position: Point,
    pub width: f64,
    pub font_size: f64,
    pub font_family: String,
    pub color: SerializableColor,
}

impl InlineEdit {
    /// Start editing `text` with its current content.
    pub fn for_text(text: &Text) -> Self {
        Self {
            id: text.id,
            value: text.content.clone(),
            position: text.transform.position,
            width: text.width * text.transform.scale_x.abs(),
            font_size: text.font_size,
            font_family: text.font_family.clone(),
            color: text.style.fill.unwrap_or_else(SerializableColor::black),
        }
    }

    /// Where the input box goes on screen under `viewport`.
    pub fn screen_position(&self, viewport: &Viewport) -> Point {
        viewport.world_to_screen(self.position)
    }
}

/// At most one selected object, plus at most one inline edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Option<ObjectId>,
    editing: Option<InlineEdit>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected == Some(id)
    }

    /// Select `id`, dropping any open inline edit.
    pub fn select(&mut self, id: ObjectId) {
        self.selected = Some(id);
        self.editing = None;
    }

    /// Clear both the selection and the inline edit.
    pub fn clear(&mut self) {
        self.selected = None;
        self.editing = None;
    }

    /// Open an inline edit. The edited object becomes the selection.
    pub fn begin_edit(&mut self, edit: InlineEdit) {
        self.selected = Some(edit.id);
        self.editing = Some(edit);
    }

    pub fn editing(&self) -> Option<&InlineEdit> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Update the input box value. Returns false when no edit is open.
    pub fn set_edit_value(&mut self, value: impl Into<String>) -> bool {
        match self.editing.as_mut() {
            Some(edit) => {
                edit.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Close the inline edit, returning it. The selection is kept.
    pub fn take_edit(&mut self) -> Option<InlineEdit> {
        self.editing.take()
    }

    /// Whether the render layer should draw `id`.
    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.editing.as_ref().is_none_or(|edit| edit.id != id)
    }

    /// Forget `id` if it is selected or being edited.
    pub fn forget(&mut self, id: ObjectId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.editing.as_ref().is_some_and(|edit| edit.id == id) {
            self.editing = None;
        }
    }

    /// UI state of `id` for the widget layer.
    pub fn widget_state(&self, id: ObjectId) -> WidgetState {
        if self.editing.as_ref().is_some_and(|edit| edit.id == id) {
            WidgetState::Editing(EditingKind::Text)
        } else if self.is_selected(id) {
            WidgetState::Selected
        } else {
            WidgetState::Normal
        }
    }
}
