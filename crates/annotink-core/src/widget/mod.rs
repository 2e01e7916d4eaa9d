//! Widget layer: UI state and transform handles for objects.
//!
//! Shapes remain pure data. The widget layer derives what the selected
//! object looks like while it is being manipulated.

mod handles;
mod state;

pub use handles::{
    HANDLE_HIT_TOLERANCE, Handle, HandleKind, HandleShape, ROTATE_HANDLE_OFFSET, handles_for,
    hit_test_handle,
};
pub use state::{EditingKind, WidgetState};
