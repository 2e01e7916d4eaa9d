//! Canvas document: ordered objects, canvas size and background.

use crate::assets::DecodedImage;
use crate::shapes::{ObjectId, Shape};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Canvas pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// A canvas document.
///
/// Objects are kept back to front: the index is the paint order and the
/// last object is topmost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasDocument {
    pub size: CanvasSize,
    pub background: Option<DecodedImage>,
    objects: Vec<Shape>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(size: CanvasSize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Objects in paint order.
    pub fn objects(&self) -> &[Shape] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&Shape> {
        self.objects.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Shape> {
        self.objects.iter_mut().find(|s| s.id() == id)
    }

    /// Paint-order index of an object.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|s| s.id() == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Append on top of everything else.
    pub fn push(&mut self, shape: Shape) {
        self.objects.push(shape);
    }

    /// Remove an object by ID.
    pub fn remove(&mut self, id: ObjectId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index))
    }

    /// Move an object one layer forward (towards front).
    /// Returns true if the object was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos + 1 < self.objects.len() {
                self.objects.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    /// Move an object one layer backward (towards back).
    /// Returns true if the object was moved, false if already at back.
    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos > 0 {
                self.objects.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }

    /// Replace the whole object sequence (undo, redo, load).
    pub fn replace_objects(&mut self, objects: Vec<Shape>) {
        self.objects = objects;
    }

    /// Topmost object under a point.
    pub fn object_at(&self, point: Point, tolerance: f64) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|s| s.hit_test(point, tolerance))
            .map(Shape::id)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}
