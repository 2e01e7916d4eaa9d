//! Transform handles for the selected object.

use crate::shapes::Shape;
use kurbo::{Point, Rect};

/// Distance from the top edge to the rotation handle (in canvas units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// A manipulation handle on an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// The kind of handle (determines behavior).
    pub kind: HandleKind,
    /// Position in canvas coordinates.
    pub position: Point,
    /// Visual shape of the handle.
    pub shape: HandleShape,
}

/// The kind of handle - determines what manipulation it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    // Endpoint handles (for lines, arrows)
    Start,
    End,
    Rotate,
}

/// Visual shape of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleShape {
    /// Square handle (default for corners).
    #[default]
    Square,
    /// Circular handle (for endpoints and rotation).
    Circle,
}

impl Handle {
    /// Create a new handle.
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self {
            kind,
            position,
            shape: HandleShape::default(),
        }
    }

    /// Set the handle shape.
    pub fn with_shape(mut self, shape: HandleShape) -> Self {
        self.shape = shape;
        self
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Handles for `shape`: start/end for polylines, otherwise the four corners
/// plus a rotation handle, all turned with the object's rotation about its
/// pivot.
pub fn handles_for(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Line(line) => endpoint_handles(&line.world_points()),
        Shape::Arrow(arrow) => endpoint_handles(&arrow.world_points()),
        _ => {
            let transform = shape.transform();
            corner_and_rotate_handles(
                shape.bounds(),
                transform.position,
                transform.rotation.to_radians(),
            )
        }
    }
}

/// The topmost handle of `shape` within `tolerance` of `point`.
pub fn hit_test_handle(shape: &Shape, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles_for(shape)
        .into_iter()
        .rev()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

fn endpoint_handles(points: &[Point]) -> Vec<Handle> {
    match (points.first(), points.last()) {
        (Some(&start), Some(&end)) if points.len() >= 2 => vec![
            Handle::new(HandleKind::Start, start).with_shape(HandleShape::Circle),
            Handle::new(HandleKind::End, end).with_shape(HandleShape::Circle),
        ],
        _ => Vec::new(),
    }
}

fn corner_and_rotate_handles(bounds: Rect, pivot: Point, rotation: f64) -> Vec<Handle> {
    let (sin_r, cos_r) = rotation.sin_cos();
    let rotate_point = |p: Point| -> Point {
        let dx = p.x - pivot.x;
        let dy = p.y - pivot.y;
        Point::new(
            pivot.x + dx * cos_r - dy * sin_r,
            pivot.y + dx * sin_r + dy * cos_r,
        )
    };
    let top_center = Point::new(bounds.center().x, bounds.y0 - ROTATE_HANDLE_OFFSET);

    vec![
        Handle::new(HandleKind::TopLeft, rotate_point(Point::new(bounds.x0, bounds.y0))),
        Handle::new(HandleKind::TopRight, rotate_point(Point::new(bounds.x1, bounds.y0))),
        Handle::new(HandleKind::BottomLeft, rotate_point(Point::new(bounds.x0, bounds.y1))),
        Handle::new(HandleKind::BottomRight, rotate_point(Point::new(bounds.x1, bounds.y1))),
        Handle::new(HandleKind::Rotate, rotate_point(top_center)).with_shape(HandleShape::Circle),
    ]
}
