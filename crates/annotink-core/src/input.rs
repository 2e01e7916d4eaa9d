//! Input events as the host delivers them.

use crate::shapes::ObjectId;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Enter,
    Escape,
    /// A printable character, as typed.
    Char(char),
}

/// A key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
    /// Whether the event target is a text input or textarea.
    pub focus_in_text_input: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            focus_in_text_input: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.focus_in_text_input = true;
        self
    }
}

/// What a click landed on, as resolved by the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickTarget {
    /// Bare stage outside the canvas image.
    Empty,
    /// The background image.
    Background,
    Object(ObjectId),
}
