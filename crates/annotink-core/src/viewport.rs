//! Viewport module for pan/zoom transforms.
//!
//! View-only state: nothing here is part of the document or its history.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom.
pub const MIN_SCALE: f64 = 0.5;
/// Largest allowed zoom.
pub const MAX_SCALE: f64 = 3.0;
/// Zoom change per zoom-in/zoom-out step.
pub const ZOOM_STEP: f64 = 0.1;
/// Zoom factor per wheel notch.
pub const WHEEL_FACTOR: f64 = 1.1;

/// Round away float noise so repeated steps land on exact tenths.
fn snap_scale(scale: f64) -> f64 {
    (scale * 1e6).round() / 1e6
}

/// Viewport manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Create a new viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Step the zoom up by [`ZOOM_STEP`], capped at [`MAX_SCALE`].
    pub fn zoom_in(&mut self) {
        self.scale = snap_scale(self.scale + ZOOM_STEP).min(MAX_SCALE);
    }

    /// Step the zoom down by [`ZOOM_STEP`], floored at [`MIN_SCALE`].
    pub fn zoom_out(&mut self) {
        self.scale = snap_scale(self.scale - ZOOM_STEP).max(MIN_SCALE);
    }

    /// Back to 100% without moving the pan offset.
    pub fn reset_zoom(&mut self) {
        self.scale = 1.0;
    }

    /// Reset viewport to default position and zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Zoom the viewport, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }

        // Convert screen point to canvas before zoom
        let world_point = self.screen_to_world(screen_point);

        self.scale = new_scale;

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        self.offset += Vec2::new(screen_point.x - new_screen.x, screen_point.y - new_screen.y);
    }

    /// Wheel zoom anchored at the pointer. Scrolling up zooms in.
    pub fn wheel(&mut self, pointer: Point, delta_y: f64) {
        if delta_y < 0.0 {
            self.zoom_at(pointer, WHEEL_FACTOR);
        } else if delta_y > 0.0 {
            self.zoom_at(pointer, 1.0 / WHEEL_FACTOR);
        }
    }
}
