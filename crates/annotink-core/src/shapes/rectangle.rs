//! Rectangle shape.

use super::{ObjectId, SerializableColor, ShapeStyle, ShapeTrait, Transform};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned box placed by its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
    pub draggable: bool,
}

impl Rectangle {
    pub const DEFAULT_POSITION: Point = Point::new(50.0, 50.0);
    pub const DEFAULT_WIDTH: f64 = 100.0;
    pub const DEFAULT_HEIGHT: f64 = 80.0;

    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: ObjectId::next(),
            transform: Transform::at(position.x, position.y),
            width,
            height,
            style: ShapeStyle::default(),
            draggable: true,
        }
    }

    /// Picker default filled with `color`.
    pub fn with_fill(color: SerializableColor) -> Self {
        let mut rect = Self::new(Self::DEFAULT_POSITION, Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT);
        rect.style = ShapeStyle::filled(color);
        rect
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

impl ShapeTrait for Rectangle {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_defaults() {
        let rect = Rectangle::with_fill(SerializableColor::black());
        assert_eq!(rect.transform.position, Point::new(50.0, 50.0));
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 80.0).abs() < f64::EPSILON);
        assert_eq!(rect.style.fill, Some(SerializableColor::black()));
        assert!(rect.draggable);
    }

    #[test]
    fn test_hit_test() {
        let rect = Rectangle::new(Point::ZERO, 100.0, 100.0);
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0));
        assert!(rect.hit_test(Point::new(105.0, 50.0), 10.0));
    }

    #[test]
    fn test_resize_bakes_scale() {
        let mut rect = Rectangle::new(Point::ZERO, 100.0, 80.0);
        let mut t = Transform::at(10.0, 20.0);
        t.scale_x = 2.0;
        t.scale_y = 0.5;
        t.rotation = 45.0;
        rect.apply_transform(t);

        assert!((rect.width - 200.0).abs() < 1e-9);
        assert!((rect.height - 40.0).abs() < 1e-9);
        assert!(!rect.transform.is_scaled());
        assert!((rect.transform.rotation - 45.0).abs() < f64::EPSILON);
        assert_eq!(rect.transform.position, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_bounds_follow_scale() {
        let mut rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        rect.transform.scale_x = 2.0;
        let bounds = rect.bounds();
        assert!((bounds.x1 - 210.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }
}
