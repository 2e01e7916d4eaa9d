//! Text shape.

use super::{ObjectId, SerializableColor, ShapeStyle, ShapeTrait, Transform};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Horizontal alignment inside the wrap width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }
}

/// Vertical alignment inside the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Bottom => "bottom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top" => Some(VerticalAlign::Top),
            "middle" => Some(VerticalAlign::Middle),
            "bottom" => Some(VerticalAlign::Bottom),
            _ => None,
        }
    }
}

/// A wrapped text block placed by its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    /// The text content.
    pub content: String,
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
    pub vertical_align: VerticalAlign,
    /// Wrap width in canvas units.
    pub width: f64,
    pub style: ShapeStyle,
    /// Template placeholder awaiting bulk replacement.
    pub is_placeholder: bool,
    pub draggable: bool,
}

impl Text {
    pub const DEFAULT_POSITION: Point = Point::new(100.0, 100.0);
    pub const DEFAULT_CONTENT: &'static str = "Double-click to edit";
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    pub const DEFAULT_WIDTH: f64 = 200.0;
    /// Wrap width per placeholder character.
    pub const PLACEHOLDER_CHAR_WIDTH: f64 = 12.0;
    pub const PLACEHOLDER_COLOR: SerializableColor = SerializableColor::rgb(0xFF, 0x57, 0x22);
    pub const PLACEHOLDER_CORNER_RADIUS: f64 = 5.0;
    const LINE_HEIGHT: f64 = 1.2;

    /// Create a new text shape filled black.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: ObjectId::next(),
            transform: Transform::at(position.x, position.y),
            content: content.into(),
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            width: Self::DEFAULT_WIDTH,
            style: ShapeStyle::filled(SerializableColor::black()),
            is_placeholder: false,
            draggable: true,
        }
    }

    /// Picker default.
    pub fn default_text() -> Self {
        Self::new(Self::DEFAULT_POSITION, Self::DEFAULT_CONTENT)
    }

    /// A placeholder tag such as `{f_name}`, outlined and tinted so it stands
    /// out from regular text.
    pub fn placeholder(tag: &str) -> Self {
        let mut text = Self::new(Self::DEFAULT_POSITION, tag);
        text.width = tag.chars().count() as f64 * Self::PLACEHOLDER_CHAR_WIDTH;
        text.style = ShapeStyle {
            fill: Some(Self::PLACEHOLDER_COLOR),
            stroke: Some(Self::PLACEHOLDER_COLOR),
            stroke_width: 1.0,
            corner_radius: Self::PLACEHOLDER_CORNER_RADIUS,
        };
        text.is_placeholder = true;
        text
    }

    /// Combined weight/slant keyword as the render layer expects it.
    pub fn font_style(&self) -> &'static str {
        match (self.italic, self.bold) {
            (false, false) => "normal",
            (false, true) => "bold",
            (true, false) => "italic",
            (true, true) => "italic bold",
        }
    }

    /// Inverse of [`Text::font_style`]. Unknown words are ignored.
    pub fn set_font_style(&mut self, style: &str) {
        let words: Vec<&str> = style.split_whitespace().collect();
        self.bold = words.contains(&"bold");
        self.italic = words.contains(&"italic");
    }

    /// `"underline"` or the empty string.
    pub fn text_decoration(&self) -> &'static str {
        if self.underline {
            "underline"
        } else {
            ""
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Approximate height based on font size and number of lines.
    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        let line_count = if self.content.ends_with('\n') {
            line_count + 1
        } else {
            line_count
        };
        line_count as f64 * self.font_size * Self::LINE_HEIGHT
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let origin = self.transform.position;
        let width = (self.width * self.transform.scale_x).abs().max(20.0);
        let height = (self.approximate_height() * self.transform.scale_y).abs();
        Rect::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
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
        // Horizontal stretch widens the wrap box instead of the glyphs.
        self.width = (self.width * transform.scale_x).abs();
        self.transform = Transform {
            scale_x: 1.0,
            ..transform
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let text = Text::default_text();
        assert_eq!(text.content(), "Double-click to edit");
        assert_eq!(text.font_family, "Arial");
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        assert!((text.width - 200.0).abs() < f64::EPSILON);
        assert_eq!(text.style.fill, Some(SerializableColor::black()));
        assert!(!text.is_placeholder);
    }

    #[test]
    fn test_placeholder() {
        let text = Text::placeholder("{f_name}");
        assert!(text.is_placeholder);
        assert!((text.width - 96.0).abs() < f64::EPSILON);
        assert_eq!(text.style.stroke, Some(Text::PLACEHOLDER_COLOR));
        assert!((text.style.corner_radius - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_font_style() {
        let mut text = Text::default_text();
        assert_eq!(text.font_style(), "normal");
        text.bold = true;
        assert_eq!(text.font_style(), "bold");
        text.italic = true;
        assert_eq!(text.font_style(), "italic bold");

        text.set_font_style("italic");
        assert!(text.italic);
        assert!(!text.bold);
    }

    #[test]
    fn test_horizontal_scale_goes_into_width() {
        let mut text = Text::default_text();
        let mut t = Transform::at(10.0, 10.0);
        t.scale_x = 1.5;
        t.scale_y = 2.0;
        text.apply_transform(t);
        assert!((text.width - 300.0).abs() < 1e-9);
        assert!((text.transform.scale_x - 1.0).abs() < f64::EPSILON);
        assert!((text.transform.scale_y - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let text = Text::new(Point::new(100.0, 100.0), "Hello World");
        let bounds = text.bounds();
        assert!(text.hit_test(bounds.center(), 0.0));
        assert!(!text.hit_test(Point::new(0.0, 0.0), 0.0));
    }

    #[test]
    fn test_multiline_height() {
        let text = Text::new(Point::ZERO, "a\nb\nc");
        assert!((text.bounds().height() - 72.0).abs() < 1e-9);
    }
}
