//! Arrow shape.

use super::line::{polyline_bounds, world_points};
use super::{ObjectId, SerializableColor, ShapeStyle, ShapeTrait, Transform};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A polyline with an arrowhead at its last point. Points are relative to
/// the transform's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    pub points: Vec<Point>,
    /// Arrowhead length along the shaft.
    pub pointer_length: f64,
    /// Arrowhead width across the shaft.
    pub pointer_width: f64,
    pub style: ShapeStyle,
    pub draggable: bool,
}

impl Arrow {
    pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;
    pub const DEFAULT_POINTER_SIZE: f64 = 10.0;

    /// Create an arrow through `points`, stroked blue.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: ObjectId::next(),
            transform: Transform::default(),
            points,
            pointer_length: Self::DEFAULT_POINTER_SIZE,
            pointer_width: Self::DEFAULT_POINTER_SIZE,
            style: ShapeStyle::stroked(SerializableColor::blue(), Self::DEFAULT_STROKE_WIDTH),
            draggable: true,
        }
    }

    /// Picker default: a horizontal arrow from (100, 100) to (300, 100).
    pub fn default_arrow() -> Self {
        Self::new(vec![Point::new(100.0, 100.0), Point::new(300.0, 100.0)])
    }

    /// Points in canvas coordinates.
    pub fn world_points(&self) -> Vec<Point> {
        world_points(&self.points, &self.transform)
    }

    /// Tip, left and right corners of the arrowhead in canvas coordinates.
    pub fn head(&self) -> Option<[Point; 3]> {
        let pts = self.world_points();
        let [.., prev, tip] = pts.as_slice() else {
            return None;
        };
        let d = Vec2::new(tip.x - prev.x, tip.y - prev.y);
        let len = d.hypot();
        let dir = if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            d / len
        };
        let perp = Vec2::new(-dir.y, dir.x);
        let back = *tip - dir * self.pointer_length;
        let half = self.pointer_width / 2.0;
        Some([*tip, back + perp * half, back - perp * half])
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let mut pts = self.world_points();
        if let Some(head) = self.head() {
            pts.extend(head);
        }
        polyline_bounds(&pts)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.style.stroke_width / 2.0;
        if super::point_to_polyline_dist(point, &self.world_points()) <= reach {
            return true;
        }
        let Some([tip, left, right]) = self.head() else {
            return false;
        };

        fn sign(p1: Point, p2: Point, p3: Point) -> f64 {
            (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
        }

        let d1 = sign(point, tip, left);
        let d2 = sign(point, left, right);
        let d3 = sign(point, right, tip);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
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
        super::scale_points(&mut self.points, transform.scale_x, transform.scale_y);
        self.transform = Transform {
            scale_x: 1.0,
            scale_y: 1.0,
            ..transform
        };
    }
}
