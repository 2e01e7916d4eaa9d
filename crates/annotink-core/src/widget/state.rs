//! Widget state definitions.

/// The UI state of an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WidgetState {
    /// Normal display state - no interaction.
    #[default]
    Normal,
    /// Object is selected (shows handles, can be moved/resized).
    Selected,
    /// Object is hidden behind an inline editor.
    Editing(EditingKind),
}

impl WidgetState {
    /// Check if the object is selected (either just selected or editing).
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing(_))
    }

    /// Check if the object is in editing mode.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    /// Handles are drawn only for a plain selection.
    pub fn shows_handles(&self) -> bool {
        matches!(self, Self::Selected)
    }
}

/// Kind of editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingKind {
    /// Inline text editing.
    Text,
}
