//! Keyboard shortcut registry and resolution.

use crate::input::{Key, KeyPress};

/// Editor action a shortcut triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    DeleteSelection,
    Undo,
    Redo,
    /// Write the inline text edit back into the document.
    CommitTextEdit,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub command: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        if self.command {
            format!("Ctrl+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(
                "Delete",
                false,
                ShortcutAction::DeleteSelection,
                "Delete selected object",
            ),
            Shortcut::new(
                "Backspace",
                false,
                ShortcutAction::DeleteSelection,
                "Delete selected object",
            ),
            Shortcut::new("Z", true, ShortcutAction::Undo, "Undo"),
            Shortcut::new("Y", true, ShortcutAction::Redo, "Redo"),
            Shortcut::new("Enter", false, ShortcutAction::CommitTextEdit, "Finish text editing"),
        ]
    }

    /// Map a key press to an action.
    ///
    /// Presses aimed at a text input are ignored, except Enter while an
    /// inline text edit is open. Enter without an open edit does nothing.
    pub fn resolve(press: &KeyPress, editing_text: bool) -> Option<ShortcutAction> {
        if press.focus_in_text_input {
            return (press.key == Key::Enter && editing_text)
                .then_some(ShortcutAction::CommitTextEdit);
        }
        match press.key {
            Key::Delete | Key::Backspace => Some(ShortcutAction::DeleteSelection),
            Key::Enter if editing_text => Some(ShortcutAction::CommitTextEdit),
            Key::Char(c) if press.modifiers.command() => match c.to_ascii_lowercase() {
                'z' => Some(ShortcutAction::Undo),
                'y' => Some(ShortcutAction::Redo),
                _ => None,
            },
            _ => None,
        }
    }
}
