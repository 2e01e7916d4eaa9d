//! Image shape for overlaying raster images.

use super::{ObjectId, ShapeStyle, ShapeTrait, Transform};
use crate::assets::DecodedImage;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An overlay image. Pixels are owned by the render layer; the model keeps
/// the source reference and the decoded pixel size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Data URI or remote URL the pixels were decoded from.
    pub source: String,
    /// Decoded width in pixels.
    pub pixel_width: u32,
    /// Decoded height in pixels.
    pub pixel_height: u32,
    pub style: ShapeStyle,
    pub draggable: bool,
}

impl Image {
    pub const DEFAULT_POSITION: Point = Point::new(100.0, 100.0);
    pub const DEFAULT_SIZE: f64 = 200.0;

    /// Create an image displayed at `width` x `height`.
    pub fn new(position: Point, decoded: &DecodedImage, width: f64, height: f64) -> Self {
        Self {
            id: ObjectId::next(),
            transform: Transform::at(position.x, position.y),
            width,
            height,
            source: decoded.source.clone(),
            pixel_width: decoded.width,
            pixel_height: decoded.height,
            style: ShapeStyle::default(),
            draggable: true,
        }
    }

    /// Overlay default: 200x200 at (100, 100), whatever the pixel size.
    pub fn overlay(decoded: &DecodedImage) -> Self {
        Self::new(
            Self::DEFAULT_POSITION,
            decoded,
            Self::DEFAULT_SIZE,
            Self::DEFAULT_SIZE,
        )
    }

    pub fn as_rect(&self) -> Rect {
        let origin = self.transform.position;
        Rect::new(
            origin.x,
            origin.y,
            origin.x + self.width * self.transform.scale_x,
            origin.y + self.height * self.transform.scale_y,
        )
        .abs()
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_rect().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn apply_transform(&mut self, transform: Transform) {
        self.width = (self.width * transform.scale_x).abs();
        self.height = (self.height * transform.scale_y).abs();
        self.transform = Transform {
            scale_x: 1.0,
            scale_y: 1.0,
            ..transform
        };
    }
}
