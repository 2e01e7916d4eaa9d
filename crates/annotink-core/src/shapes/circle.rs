//! Circle shape.

use super::{ObjectId, SerializableColor, ShapeStyle, ShapeTrait, Transform};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A circle placed by its center. A non-uniform scale turns it into an
/// ellipse on screen; that scale is kept on the transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    pub radius: f64,
    pub style: ShapeStyle,
    pub draggable: bool,
}

impl Circle {
    pub const DEFAULT_CENTER: Point = Point::new(200.0, 200.0);
    pub const DEFAULT_RADIUS: f64 = 50.0;

    /// Create a new circle.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: ObjectId::next(),
            transform: Transform::at(center.x, center.y),
            radius,
            style: ShapeStyle::default(),
            draggable: true,
        }
    }

    /// Picker default filled with `color`.
    pub fn with_fill(color: SerializableColor) -> Self {
        let mut circle = Self::new(Self::DEFAULT_CENTER, Self::DEFAULT_RADIUS);
        circle.style = ShapeStyle::filled(color);
        circle
    }

    pub fn center(&self) -> Point {
        self.transform.position
    }

    fn radii(&self) -> (f64, f64) {
        (
            (self.radius * self.transform.scale_x).abs(),
            (self.radius * self.transform.scale_y).abs(),
        )
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let (rx, ry) = self.radii();
        let c = self.center();
        Rect::new(c.x - rx, c.y - ry, c.x + rx, c.y + ry)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let (rx, ry) = self.radii();
        let (rx, ry) = (rx + tolerance, ry + tolerance);
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let c = self.center();
        let dx = (point.x - c.x) / rx;
        let dy = (point.y - c.y) / ry;
        dx * dx + dy * dy <= 1.0
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
        if transform.is_uniform() {
            self.radius = (self.radius * transform.scale_x).abs();
            self.transform = Transform {
                scale_x: 1.0,
                scale_y: 1.0,
                ..transform
            };
        } else {
            self.transform = transform;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_defaults() {
        let circle = Circle::with_fill(SerializableColor::blue());
        assert_eq!(circle.center(), Point::new(200.0, 200.0));
        assert!((circle.radius - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let circle = Circle::new(Point::new(100.0, 100.0), 50.0);
        assert!(circle.hit_test(Point::new(100.0, 140.0), 0.0));
        assert!(!circle.hit_test(Point::new(140.0, 140.0), 0.0));
    }

    #[test]
    fn test_uniform_scale_folds_into_radius() {
        let mut circle = Circle::new(Point::ZERO, 50.0);
        let mut t = Transform::at(5.0, 5.0);
        t.scale_x = 2.0;
        t.scale_y = 2.0;
        circle.apply_transform(t);
        assert!((circle.radius - 100.0).abs() < 1e-9);
        assert!(!circle.transform.is_scaled());
    }

    #[test]
    fn test_non_uniform_scale_is_kept() {
        let mut circle = Circle::new(Point::ZERO, 50.0);
        let mut t = Transform::at(0.0, 0.0);
        t.scale_x = 2.0;
        t.scale_y = 1.0;
        circle.apply_transform(t);
        assert!((circle.radius - 50.0).abs() < 1e-9);
        assert!((circle.transform.scale_x - 2.0).abs() < f64::EPSILON);
        let bounds = circle.bounds();
        assert!((bounds.width() - 200.0).abs() < 1e-9);
        assert!((bounds.height() - 100.0).abs() < 1e-9);
    }
}
