//! Star shape.

use super::{ObjectId, SerializableColor, ShapeStyle, ShapeTrait, Transform};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A regular star placed by its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    /// Number of outer tips.
    pub num_points: u32,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub style: ShapeStyle,
    pub draggable: bool,
}

impl Star {
    pub const DEFAULT_CENTER: Point = Point::new(300.0, 200.0);
    pub const DEFAULT_POINTS: u32 = 5;
    pub const DEFAULT_INNER_RADIUS: f64 = 30.0;
    pub const DEFAULT_OUTER_RADIUS: f64 = 60.0;
    pub const MIN_POINTS: u32 = 2;
    pub const MAX_POINTS: u32 = 100;

    /// Create a new star. `num_points` is clamped to
    /// [`MIN_POINTS`](Self::MIN_POINTS)..=[`MAX_POINTS`](Self::MAX_POINTS).
    pub fn new(center: Point, num_points: u32, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            id: ObjectId::next(),
            transform: Transform::at(center.x, center.y),
            num_points: num_points.clamp(Self::MIN_POINTS, Self::MAX_POINTS),
            inner_radius,
            outer_radius,
            style: ShapeStyle::default(),
            draggable: true,
        }
    }

    /// Picker default filled with `color`.
    pub fn with_fill(color: SerializableColor) -> Self {
        let mut star = Self::new(
            Self::DEFAULT_CENTER,
            Self::DEFAULT_POINTS,
            Self::DEFAULT_INNER_RADIUS,
            Self::DEFAULT_OUTER_RADIUS,
        );
        star.style = ShapeStyle::filled(color);
        star
    }

    /// Outline vertices in canvas coordinates, alternating outer and inner
    /// radius, first tip pointing up.
    pub fn vertices(&self) -> Vec<Point> {
        let n = self.num_points.clamp(Self::MIN_POINTS, Self::MAX_POINTS) as usize;
        let c = self.transform.position;
        (0..n * 2)
            .map(|i| {
                let r = if i % 2 == 0 {
                    self.outer_radius
                } else {
                    self.inner_radius
                };
                let angle = PI * i as f64 / n as f64;
                Point::new(
                    c.x + r * angle.sin() * self.transform.scale_x,
                    c.y - r * angle.cos() * self.transform.scale_y,
                )
            })
            .collect()
    }
}

impl ShapeTrait for Star {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let c = self.transform.position;
        let rx = (self.outer_radius * self.transform.scale_x).abs();
        let ry = (self.outer_radius * self.transform.scale_y).abs();
        Rect::new(c.x - rx, c.y - ry, c.x + rx, c.y + ry)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Even-odd test against the outline.
        let verts = self.vertices();
        let mut inside = false;
        let mut j = verts.len() - 1;
        for i in 0..verts.len() {
            let (a, b) = (verts[i], verts[j]);
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        if inside {
            return true;
        }
        let mut closed = verts;
        if let Some(&first) = closed.first() {
            closed.push(first);
        }
        super::point_to_polyline_dist(point, &closed) <= tolerance
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
            let factor = transform.scale_x.abs();
            self.inner_radius *= factor;
            self.outer_radius *= factor;
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
