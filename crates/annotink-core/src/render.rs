//! Seams to the external 2D render layer.
//!
//! The render layer owns the scene graph and the live transforms of objects
//! while they are dragged or resized. The model holds the last committed
//! geometry and asks the render layer for live values only at gesture end
//! and when serializing.

use crate::canvas::CanvasDocument;
use crate::shapes::{ObjectId, Transform};
use thiserror::Error;

/// Render layer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Rasterization failed: {0}")]
    RasterizeFailed(String),
}

/// Live transform lookup on the render layer.
pub trait RenderSync {
    /// Current on-screen transform of an object, if the render layer
    /// holds a node for it.
    fn live_transform(&self, id: ObjectId) -> Option<Transform>;
}

/// RGBA8 pixel buffer, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterImage {
    /// Expected buffer length for the stated dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Flattens a document (background plus objects) into pixels.
pub trait Rasterizer {
    fn rasterize(
        &self,
        document: &CanvasDocument,
        pixel_ratio: f64,
    ) -> Result<RasterImage, RenderError>;
}
