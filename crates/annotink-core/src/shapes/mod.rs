//! Shape definitions for annotation objects.

mod arrow;
mod circle;
mod image;
mod line;
mod rectangle;
mod star;
mod text;

pub use arrow::Arrow;
pub use circle::Circle;
pub use self::image::Image;
pub use line::Line;
pub use rectangle::Rectangle;
pub use star::Star;
pub use text::{Text, TextAlign, VerticalAlign};

use kurbo::{Point, Rect};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Attributes that may be written into a persisted document.
///
/// Anything else a shape carries (placeholder padding, drag flags, decoded
/// pixel handles) stays in memory only.
pub const SERIALIZABLE_ATTRS: [&str; 24] = [
    "x",
    "y",
    "width",
    "height",
    "radius",
    "scaleX",
    "scaleY",
    "rotation",
    "text",
    "fontSize",
    "fontFamily",
    "fill",
    "stroke",
    "strokeWidth",
    "align",
    "verticalAlign",
    "points",
    "pointerLength",
    "pointerWidth",
    "numPoints",
    "innerRadius",
    "outerRadius",
    "textDecoration",
    "fontStyle",
];

/// Unique, orderable identifier for canvas objects.
///
/// Ids come from a process-wide counter, so an id is never handed out twice
/// and later objects always compare greater than earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn blue() -> Self {
        Self::rgb(0, 0, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse any CSS color string (hex, named, `rgb()`, ...). Anything
    /// that does not parse is `None`.
    pub fn parse(css: &str) -> Option<Self> {
        match parse_color(css) {
            Ok(color) => Some(Self::from(color.to_alpha_color::<Srgb>())),
            Err(e) => {
                log::debug!("Unparseable color {:?}: {}", css, e);
                None
            }
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Paint properties shared by every kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color (None = no stroke).
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
    /// Corner rounding, only honored by boxed kinds. Never persisted.
    #[serde(default)]
    pub corner_radius: f64,
}

impl ShapeStyle {
    /// A filled style without stroke.
    pub fn filled(color: SerializableColor) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    /// A stroked style without fill.
    pub fn stroked(color: SerializableColor, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
            corner_radius: 0.0,
        }
    }

    /// Get the fill color as a peniko Color.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill.map(Color::from)
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke.map(Color::from)
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            corner_radius: 0.0,
        }
    }
}

/// Position, scale and rotation of an object as the render layer sees it.
///
/// Rotation is in degrees, clockwise, around the object's origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl Transform {
    /// Identity transform placed at `(x, y)`.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            ..Self::default()
        }
    }

    /// Whether the scale differs from 1 on either axis.
    pub fn is_scaled(&self) -> bool {
        (self.scale_x - 1.0).abs() > f64::EPSILON || (self.scale_y - 1.0).abs() > f64::EPSILON
    }

    /// Whether both axes share the same scale factor.
    pub fn is_uniform(&self) -> bool {
        (self.scale_x - self.scale_y).abs() < 1e-9
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

/// Discriminant of [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Star,
    Line,
    Arrow,
    Image,
    Text,
}

impl ShapeKind {
    /// Type tag used in persisted documents.
    pub fn type_name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Star => "star",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Image => "image",
            ShapeKind::Text => "text",
        }
    }

    /// Inverse of [`ShapeKind::type_name`].
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "rect" => Some(ShapeKind::Rectangle),
            "circle" => Some(ShapeKind::Circle),
            "star" => Some(ShapeKind::Star),
            "line" => Some(ShapeKind::Line),
            "arrow" => Some(ShapeKind::Arrow),
            "image" => Some(ShapeKind::Image),
            "text" => Some(ShapeKind::Text),
            _ => None,
        }
    }
}

/// Kinds that can be created from the shape picker without extra input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Rectangle,
    Circle,
    Star,
    Line,
    Arrow,
    Text,
}

impl PrimitiveKind {
    pub fn all() -> &'static [PrimitiveKind] {
        &[
            PrimitiveKind::Rectangle,
            PrimitiveKind::Circle,
            PrimitiveKind::Star,
            PrimitiveKind::Line,
            PrimitiveKind::Arrow,
            PrimitiveKind::Text,
        ]
    }

    /// Build a shape with the picker defaults. `color` fills the closed
    /// kinds; lines, arrows and text keep their own colors.
    pub fn instantiate(self, color: SerializableColor) -> Shape {
        match self {
            PrimitiveKind::Rectangle => Shape::Rectangle(Rectangle::with_fill(color)),
            PrimitiveKind::Circle => Shape::Circle(Circle::with_fill(color)),
            PrimitiveKind::Star => Shape::Star(Star::with_fill(color)),
            PrimitiveKind::Line => Shape::Line(Line::default_line()),
            PrimitiveKind::Arrow => Shape::Arrow(Arrow::default_arrow()),
            PrimitiveKind::Text => Shape::Text(Text::default_text()),
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Common behavior of every annotation kind.
pub trait ShapeTrait {
    fn id(&self) -> ObjectId;

    /// Axis-aligned bounds in canvas coordinates (rotation ignored).
    fn bounds(&self) -> Rect;

    /// Check if a canvas point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Committed position/scale/rotation.
    fn transform(&self) -> &Transform;

    /// Commit a transform reported at the end of a drag or resize gesture.
    ///
    /// Scale is folded into the kind's own geometry wherever the kind can
    /// express it, so later edits never compound a stale scale factor.
    fn apply_transform(&mut self, transform: Transform);
}

/// A canvas object: one variant per annotation kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Star(Star),
    Line(Line),
    Arrow(Arrow),
    Image(Image),
    Text(Text),
}

impl Shape {
    fn inner(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Circle(s) => s,
            Shape::Star(s) => s,
            Shape::Line(s) => s,
            Shape::Arrow(s) => s,
            Shape::Image(s) => s,
            Shape::Text(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Circle(s) => s,
            Shape::Star(s) => s,
            Shape::Line(s) => s,
            Shape::Arrow(s) => s,
            Shape::Image(s) => s,
            Shape::Text(s) => s,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.inner().id()
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Star(_) => ShapeKind::Star,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Image(_) => ShapeKind::Image,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.inner().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.inner().hit_test(point, tolerance)
    }

    pub fn style(&self) -> &ShapeStyle {
        self.inner().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.inner_mut().style_mut()
    }

    pub fn transform(&self) -> &Transform {
        self.inner().transform()
    }

    pub fn apply_transform(&mut self, transform: Transform) {
        self.inner_mut().apply_transform(transform);
    }

    /// Whether the object can be dragged. Always true for objects this crate
    /// creates or rehydrates.
    pub fn draggable(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.draggable,
            Shape::Circle(s) => s.draggable,
            Shape::Star(s) => s.draggable,
            Shape::Line(s) => s.draggable,
            Shape::Arrow(s) => s.draggable,
            Shape::Image(s) => s.draggable,
            Shape::Text(s) => s.draggable,
        }
    }

    /// Whether this is a placeholder text awaiting bulk replacement.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Shape::Text(t) if t.is_placeholder)
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Shape::Image(img) => Some(img),
            _ => None,
        }
    }
}

/// Scale a list of local points by per-axis factors.
pub(crate) fn scale_points(points: &mut [Point], scale_x: f64, scale_y: f64) {
    for p in points {
        p.x *= scale_x;
        p.y *= scale_y;
    }
}
