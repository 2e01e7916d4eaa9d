//! Line shape.

use super::{ObjectId, SerializableColor, ShapeStyle, ShapeTrait, Transform};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A straight polyline. Points are relative to the transform's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    pub points: Vec<Point>,
    pub style: ShapeStyle,
    pub draggable: bool,
}

impl Line {
    pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

    /// Create a polyline through `points`, stroked black.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: ObjectId::next(),
            transform: Transform::default(),
            points,
            style: ShapeStyle::stroked(SerializableColor::black(), Self::DEFAULT_STROKE_WIDTH),
            draggable: true,
        }
    }

    /// Picker default: a diagonal from (50, 50) to (200, 200).
    pub fn default_line() -> Self {
        Self::new(vec![Point::new(50.0, 50.0), Point::new(200.0, 200.0)])
    }

    /// Points in canvas coordinates.
    pub fn world_points(&self) -> Vec<Point> {
        world_points(&self.points, &self.transform)
    }
}

/// Map local points through a transform. Rotation is ignored; it only
/// affects how the render layer draws the polyline.
pub(crate) fn world_points(points: &[Point], transform: &Transform) -> Vec<Point> {
    let origin = transform.position;
    points
        .iter()
        .map(|p| {
            Point::new(
                origin.x + p.x * transform.scale_x,
                origin.y + p.y * transform.scale_y,
            )
        })
        .collect()
}

pub(crate) fn polyline_bounds(points: &[Point]) -> Rect {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(*first, *first), |rect, p| {
        rect.union_pt(*p)
    })
}

impl ShapeTrait for Line {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Rect {
        polyline_bounds(&self.world_points())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.style.stroke_width / 2.0;
        super::point_to_polyline_dist(point, &self.world_points()) <= reach
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
