//! Plain-data document snapshots for save, load and templates.
//!
//! A [`DocumentSnapshot`] is what gets written to local storage. Only the
//! attributes named in [`SERIALIZABLE_ATTRS`](crate::shapes::SERIALIZABLE_ATTRS)
//! (plus `imageData` for images) ever reach it, because [`ObjectAttrs`]
//! has no field for anything else.

use crate::assets::{DecodeError, DecodedImage, ImageLoader};
use crate::canvas::{CanvasDocument, CanvasSize};
use crate::render::RenderSync;
use crate::shapes::{
    Arrow, Circle, Image, Line, Rectangle, SerializableColor, Shape, ShapeKind, ShapeStyle, Star,
    Text, TextAlign, Transform, VerticalAlign,
};
use futures::future::{join, join_all};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Whitelisted attributes of one object. Absent values fall back to the
/// kind's construction defaults on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
    /// Flat `[x0, y0, x1, y1, ...]` list relative to `x`/`y`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    /// Pixel source of image objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

impl ObjectAttrs {
    /// Capture a shape's attributes. `live` overrides the committed
    /// position, scale and rotation.
    pub fn from_shape(shape: &Shape, live: Option<Transform>) -> Self {
        let transform = live.unwrap_or(*shape.transform());
        let mut attrs = Self {
            x: Some(transform.position.x),
            y: Some(transform.position.y),
            scale_x: Some(transform.scale_x),
            scale_y: Some(transform.scale_y),
            rotation: Some(transform.rotation),
            ..Self::default()
        };
        let style = shape.style();
        attrs.fill = style.fill.map(|c| c.to_hex());
        attrs.stroke = style.stroke.map(|c| c.to_hex());
        attrs.stroke_width = Some(style.stroke_width);

        match shape {
            Shape::Rectangle(rect) => {
                attrs.width = Some(rect.width);
                attrs.height = Some(rect.height);
            }
            Shape::Circle(circle) => {
                attrs.radius = Some(circle.radius);
            }
            Shape::Star(star) => {
                attrs.num_points = Some(star.num_points);
                attrs.inner_radius = Some(star.inner_radius);
                attrs.outer_radius = Some(star.outer_radius);
            }
            Shape::Line(line) => {
                attrs.points = Some(flatten_points(&line.points));
            }
            Shape::Arrow(arrow) => {
                attrs.points = Some(flatten_points(&arrow.points));
                attrs.pointer_length = Some(arrow.pointer_length);
                attrs.pointer_width = Some(arrow.pointer_width);
            }
            Shape::Image(image) => {
                attrs.width = Some(image.width);
                attrs.height = Some(image.height);
                attrs.image_data = Some(image.source.clone());
            }
            Shape::Text(text) => {
                attrs.text = Some(text.content.clone());
                attrs.font_size = Some(text.font_size);
                attrs.font_family = Some(text.font_family.clone());
                attrs.width = Some(text.width);
                attrs.align = Some(text.align.as_str().to_string());
                attrs.vertical_align = Some(text.vertical_align.as_str().to_string());
                attrs.font_style = Some(text.font_style().to_string());
                attrs.text_decoration = Some(text.text_decoration().to_string());
            }
        }
        attrs
    }

    fn transform(&self) -> Transform {
        Transform {
            position: Point::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0)),
            scale_x: self.scale_x.unwrap_or(1.0),
            scale_y: self.scale_y.unwrap_or(1.0),
            rotation: self.rotation.unwrap_or(0.0),
        }
    }

    /// Overlay the persisted paint attributes on a kind's default style.
    /// Colors that do not parse keep the default.
    fn style_over(&self, mut base: ShapeStyle) -> ShapeStyle {
        if let Some(fill) = self.fill.as_deref().and_then(SerializableColor::parse) {
            base.fill = Some(fill);
        }
        if let Some(stroke) = self.stroke.as_deref().and_then(SerializableColor::parse) {
            base.stroke = Some(stroke);
        }
        if let Some(width) = self.stroke_width {
            base.stroke_width = width;
        }
        base
    }

    fn points(&self, default: Vec<Point>) -> Vec<Point> {
        match self.points.as_deref() {
            Some(flat) => {
                if flat.len() % 2 != 0 {
                    log::warn!("Dropping dangling coordinate of a {}-value point list", flat.len());
                }
                unflatten_points(flat)
            }
            None => default,
        }
    }
}

fn flatten_points(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

fn unflatten_points(flat: &[f64]) -> Vec<Point> {
    flat.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect()
}

/// Build a live object from persisted attributes with a fresh id.
///
/// Image objects need their decoded source; without it `None` is returned.
pub(crate) fn shape_from_attrs(
    kind: ShapeKind,
    attrs: &ObjectAttrs,
    is_placeholder: bool,
    decoded: Option<&DecodedImage>,
) -> Option<Shape> {
    let transform = attrs.transform();
    let origin = transform.position;
    let shape = match kind {
        ShapeKind::Rectangle => {
            let mut rect = Rectangle::new(
                origin,
                attrs.width.unwrap_or(Rectangle::DEFAULT_WIDTH),
                attrs.height.unwrap_or(Rectangle::DEFAULT_HEIGHT),
            );
            rect.style = attrs.style_over(rect.style.clone());
            rect.transform = transform;
            Shape::Rectangle(rect)
        }
        ShapeKind::Circle => {
            let mut circle = Circle::new(origin, attrs.radius.unwrap_or(Circle::DEFAULT_RADIUS));
            circle.style = attrs.style_over(circle.style.clone());
            circle.transform = transform;
            Shape::Circle(circle)
        }
        ShapeKind::Star => {
            let mut star = Star::new(
                origin,
                attrs.num_points.unwrap_or(Star::DEFAULT_POINTS),
                attrs.inner_radius.unwrap_or(Star::DEFAULT_INNER_RADIUS),
                attrs.outer_radius.unwrap_or(Star::DEFAULT_OUTER_RADIUS),
            );
            star.style = attrs.style_over(star.style.clone());
            star.transform = transform;
            Shape::Star(star)
        }
        ShapeKind::Line => {
            let mut line = Line::new(attrs.points(Line::default_line().points));
            line.style = attrs.style_over(line.style.clone());
            line.transform = transform;
            Shape::Line(line)
        }
        ShapeKind::Arrow => {
            let mut arrow = Arrow::new(attrs.points(Arrow::default_arrow().points));
            arrow.pointer_length = attrs.pointer_length.unwrap_or(Arrow::DEFAULT_POINTER_SIZE);
            arrow.pointer_width = attrs.pointer_width.unwrap_or(Arrow::DEFAULT_POINTER_SIZE);
            arrow.style = attrs.style_over(arrow.style.clone());
            arrow.transform = transform;
            Shape::Arrow(arrow)
        }
        ShapeKind::Image => {
            let decoded = decoded?;
            let mut image = Image::new(
                origin,
                decoded,
                attrs.width.unwrap_or(decoded.width as f64),
                attrs.height.unwrap_or(decoded.height as f64),
            );
            image.style = attrs.style_over(image.style.clone());
            image.transform = transform;
            Shape::Image(image)
        }
        ShapeKind::Text => {
            let mut text = if is_placeholder {
                Text::placeholder(attrs.text.as_deref().unwrap_or_default())
            } else {
                Text::new(origin, attrs.text.clone().unwrap_or_default())
            };
            if let Some(size) = attrs.font_size {
                text.font_size = size;
            }
            if let Some(family) = &attrs.font_family {
                text.font_family = family.clone();
            }
            if let Some(width) = attrs.width {
                text.width = width;
            }
            if let Some(align) = attrs.align.as_deref().and_then(TextAlign::parse) {
                text.align = align;
            }
            if let Some(valign) = attrs.vertical_align.as_deref().and_then(VerticalAlign::parse) {
                text.vertical_align = valign;
            }
            if let Some(style) = &attrs.font_style {
                text.set_font_style(style);
            }
            text.underline = attrs
                .text_decoration
                .as_deref()
                .is_some_and(|d| d.contains("underline"));
            text.style = attrs.style_over(text.style.clone());
            text.transform = transform;
            Shape::Text(text)
        }
    };
    Some(shape)
}

/// One persisted object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedObject {
    /// Id at save time. Ignored on load, where fresh ids are assigned.
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_placeholder: bool,
    #[serde(default)]
    pub attrs: ObjectAttrs,
}

/// Serialized form of a whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub version: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub canvas_size: CanvasSize,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub objects: Vec<SerializedObject>,
}

impl DocumentSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    #[cfg(not(target_arch = "wasm32"))]
    use std::time::{SystemTime, UNIX_EPOCH};
    #[cfg(target_arch = "wasm32")]
    use web_time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Capture the document. When `renderer` is given, live transforms it
/// reports win over committed ones.
pub fn serialize(document: &CanvasDocument, renderer: Option<&dyn RenderSync>) -> DocumentSnapshot {
    let objects = document
        .objects()
        .iter()
        .map(|shape| {
            let live = renderer.and_then(|r| r.live_transform(shape.id()));
            SerializedObject {
                id: serde_json::Value::from(shape.id().get()),
                kind: shape.kind().type_name().to_string(),
                is_placeholder: shape.is_placeholder(),
                attrs: ObjectAttrs::from_shape(shape, live),
            }
        })
        .collect::<Vec<_>>();

    log::debug!("Serialized {} objects", objects.len());
    DocumentSnapshot {
        version: SNAPSHOT_VERSION.to_string(),
        timestamp: now_millis(),
        canvas_size: document.size,
        background_image: document.background.as_ref().map(|bg| bg.source.clone()),
        objects,
    }
}

/// Something that was dropped while loading a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadWarning {
    #[error("Object {index} has unknown type {kind:?}")]
    UnknownType { index: usize, kind: String },
    #[error("Image object {index} has no image data")]
    MissingImageData { index: usize },
    #[error("Image object {index} failed to decode: {reason}")]
    ImageDecode { index: usize, reason: String },
    #[error("Background image failed to decode: {reason}")]
    BackgroundDecode { reason: String },
}

/// A rehydrated document plus whatever had to be dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadedDocument {
    pub document: CanvasDocument,
    pub warnings: Vec<LoadWarning>,
}

/// Rebuild a document from a snapshot.
///
/// Every image reference is decoded through `loader` concurrently; the
/// result is returned only after all decodes have settled. Objects whose
/// image fails to decode and objects of unknown type are skipped, and a
/// failing background is dropped, each with a [`LoadWarning`].
pub async fn deserialize(snapshot: &DocumentSnapshot, loader: &dyn ImageLoader) -> LoadedDocument {
    let mut warnings = Vec::new();

    let image_sources: Vec<(usize, &str)> = snapshot
        .objects
        .iter()
        .enumerate()
        .filter(|(_, obj)| obj.kind == ShapeKind::Image.type_name())
        .filter_map(|(index, obj)| obj.attrs.image_data.as_deref().map(|src| (index, src)))
        .collect();

    let background = async {
        match snapshot.background_image.as_deref() {
            Some(source) => Some(loader.decode(source).await),
            None => None,
        }
    };
    let images = join_all(image_sources.iter().map(|(_, src)| loader.decode(src)));
    let (background, images) = join(background, images).await;

    let mut decoded: Vec<Option<Result<DecodedImage, DecodeError>>> =
        (0..snapshot.objects.len()).map(|_| None).collect();
    for ((index, _), result) in image_sources.iter().zip(images) {
        decoded[*index] = Some(result);
    }

    let mut document = CanvasDocument::with_size(snapshot.canvas_size);
    document.background = match background {
        Some(Ok(image)) => Some(image),
        Some(Err(e)) => {
            log::warn!("Dropping background image: {}", e);
            warnings.push(LoadWarning::BackgroundDecode {
                reason: e.to_string(),
            });
            None
        }
        None => None,
    };

    for (index, obj) in snapshot.objects.iter().enumerate() {
        let Some(kind) = ShapeKind::from_type_name(&obj.kind) else {
            log::warn!("Skipping object {} of unknown type {:?}", index, obj.kind);
            warnings.push(LoadWarning::UnknownType {
                index,
                kind: obj.kind.clone(),
            });
            continue;
        };

        let image = match (kind, decoded[index].take()) {
            (ShapeKind::Image, None) => {
                log::warn!("Skipping image object {} without image data", index);
                warnings.push(LoadWarning::MissingImageData { index });
                continue;
            }
            (ShapeKind::Image, Some(Err(e))) => {
                log::warn!("Skipping image object {}: {}", index, e);
                warnings.push(LoadWarning::ImageDecode {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
            (_, Some(Ok(image))) => Some(image),
            _ => None,
        };

        let shape = shape_from_attrs(kind, &obj.attrs, obj.is_placeholder, image.as_ref());
        if let Some(shape) = shape {
            document.push(shape);
        }
    }

    log::info!(
        "Loaded snapshot: {} objects, {} warnings",
        document.len(),
        warnings.len()
    );
    LoadedDocument { document, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::DataUrlLoader;
    use crate::assets::test_support::png_data_url;
    use crate::render::test_support::FakeRenderSync;
    use crate::shapes::{PrimitiveKind, SERIALIZABLE_ATTRS};

    fn sample_document() -> CanvasDocument {
        let mut doc = CanvasDocument::with_size(CanvasSize::new(1123, 794));
        for kind in PrimitiveKind::all() {
            doc.push(kind.instantiate(SerializableColor::rgb(10, 20, 30)));
        }
        doc.push(Shape::Text(Text::placeholder("{f_name}")));
        doc
    }

    #[test]
    fn test_snapshot_header() {
        let snapshot = serialize(&sample_document(), None);
        assert_eq!(snapshot.version, "1.0");
        assert!(snapshot.timestamp > 0);
        assert_eq!(snapshot.canvas_size, CanvasSize::new(1123, 794));
        assert_eq!(snapshot.background_image, None);
        assert_eq!(snapshot.objects.len(), 7);
        assert_eq!(snapshot.objects[0].kind, "rect");
        assert!(snapshot.objects[6].is_placeholder);
    }

    #[test]
    fn test_attrs_stay_within_whitelist() {
        let mut doc = sample_document();
        doc.push(Shape::Image(Image::overlay(&DecodedImage {
            source: png_data_url(2, 2),
            width: 2,
            height: 2,
        })));
        let json = serde_json::to_value(serialize(&doc, None)).unwrap();
        for obj in json["objects"].as_array().unwrap() {
            for key in obj["attrs"].as_object().unwrap().keys() {
                assert!(
                    SERIALIZABLE_ATTRS.contains(&key.as_str()) || key == "imageData",
                    "unexpected attribute {key}"
                );
            }
        }
    }

    #[test]
    fn test_json_shape() {
        let mut doc = CanvasDocument::new();
        doc.push(PrimitiveKind::Arrow.instantiate(SerializableColor::black()));
        let json = serde_json::to_value(serialize(&doc, None)).unwrap();
        assert_eq!(json["canvasSize"]["width"], 800);
        let attrs = &json["objects"][0]["attrs"];
        assert_eq!(json["objects"][0]["type"], "arrow");
        assert_eq!(attrs["stroke"], "#0000ff");
        assert_eq!(attrs["points"], serde_json::json!([100.0, 100.0, 300.0, 100.0]));
        assert_eq!(attrs["pointerLength"], 10.0);
        assert!(json["objects"][0].get("isPlaceholder").is_none());
    }

    #[test]
    fn test_live_transform_overrides_committed() {
        let mut doc = CanvasDocument::new();
        let shape = PrimitiveKind::Rectangle.instantiate(SerializableColor::black());
        let id = shape.id();
        doc.push(shape);

        let mut renderer = FakeRenderSync::default();
        let mut live = Transform::at(400.0, 300.0);
        live.rotation = 30.0;
        renderer.live.insert(id, live);

        let snapshot = serialize(&doc, Some(&renderer));
        let attrs = &snapshot.objects[0].attrs;
        assert_eq!(attrs.x, Some(400.0));
        assert_eq!(attrs.y, Some(300.0));
        assert_eq!(attrs.rotation, Some(30.0));
        // The model itself is untouched.
        assert_eq!(doc.objects()[0].transform().position, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_roundtrip_preserves_geometry() {
        let doc = sample_document();
        let snapshot = serialize(&doc, None);
        let json = snapshot.to_json().unwrap();
        let parsed = DocumentSnapshot::from_json(&json).unwrap();
        let loaded = pollster::block_on(deserialize(&parsed, &DataUrlLoader::new()));

        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.document.size, doc.size);
        assert_eq!(loaded.document.len(), doc.len());
        for (before, after) in doc.objects().iter().zip(loaded.document.objects()) {
            assert_eq!(before.kind(), after.kind());
            assert_ne!(before.id(), after.id());
            assert!(after.draggable());
            assert_eq!(before.style(), after.style());
            assert_eq!(before.transform(), after.transform());
            let (a, b) = (before.bounds(), after.bounds());
            assert!((a.x0 - b.x0).abs() < 1e-9 && (a.y1 - b.y1).abs() < 1e-9);
        }
        let text = loaded.document.objects()[6].as_text().unwrap();
        assert!(text.is_placeholder);
        assert_eq!(text.content, "{f_name}");
    }

    #[test]
    fn test_images_and_background_are_decoded() {
        let source = png_data_url(4, 3);
        let mut doc = CanvasDocument::new();
        doc.background = Some(DecodedImage {
            source: source.clone(),
            width: 4,
            height: 3,
        });
        doc.push(Shape::Image(Image::overlay(&DecodedImage {
            source: source.clone(),
            width: 4,
            height: 3,
        })));

        let snapshot = serialize(&doc, None);
        assert_eq!(snapshot.background_image.as_deref(), Some(source.as_str()));
        let loaded = pollster::block_on(deserialize(&snapshot, &DataUrlLoader::new()));
        assert!(loaded.warnings.is_empty());
        let bg = loaded.document.background.as_ref().unwrap();
        assert_eq!((bg.width, bg.height), (4, 3));
        let image = loaded.document.objects()[0].as_image().unwrap();
        assert_eq!(image.pixel_width, 4);
        assert!((image.width - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_failures_become_warnings() {
        let snapshot = DocumentSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            timestamp: 0,
            canvas_size: CanvasSize::default(),
            background_image: Some("https://media.example.com/bg.png".to_string()),
            objects: vec![
                SerializedObject {
                    id: serde_json::Value::from(1),
                    kind: "image".to_string(),
                    is_placeholder: false,
                    attrs: ObjectAttrs {
                        image_data: Some("data:image/png;base64,AAAA".to_string()),
                        ..ObjectAttrs::default()
                    },
                },
                SerializedObject {
                    id: serde_json::Value::from(2),
                    kind: "hexagon".to_string(),
                    is_placeholder: false,
                    attrs: ObjectAttrs::default(),
                },
                SerializedObject {
                    id: serde_json::Value::from(3),
                    kind: "image".to_string(),
                    is_placeholder: false,
                    attrs: ObjectAttrs::default(),
                },
                SerializedObject {
                    id: serde_json::Value::from(4),
                    kind: "circle".to_string(),
                    is_placeholder: false,
                    attrs: ObjectAttrs::default(),
                },
            ],
        };

        let loaded = pollster::block_on(deserialize(&snapshot, &DataUrlLoader::new()));
        assert!(loaded.document.background.is_none());
        assert_eq!(loaded.document.len(), 1);
        assert_eq!(loaded.document.objects()[0].kind(), ShapeKind::Circle);
        assert_eq!(loaded.warnings.len(), 4);
        assert!(matches!(loaded.warnings[0], LoadWarning::BackgroundDecode { .. }));
        assert!(matches!(loaded.warnings[1], LoadWarning::ImageDecode { index: 0, .. }));
        assert!(matches!(loaded.warnings[2], LoadWarning::UnknownType { index: 1, .. }));
        assert!(matches!(loaded.warnings[3], LoadWarning::MissingImageData { index: 2 }));
    }

    #[test]
    fn test_missing_attrs_use_defaults() {
        let attrs = ObjectAttrs::default();
        let star = shape_from_attrs(ShapeKind::Star, &attrs, false, None).unwrap();
        match star {
            Shape::Star(star) => {
                assert_eq!(star.num_points, 5);
                assert!((star.outer_radius - 60.0).abs() < f64::EPSILON);
            }
            other => panic!("expected star, got {other:?}"),
        }
        assert!(shape_from_attrs(ShapeKind::Image, &attrs, false, None).is_none());
    }

    #[test]
    fn test_text_formatting_roundtrip() {
        let mut text = Text::default_text();
        text.bold = true;
        text.italic = true;
        text.underline = true;
        text.align = TextAlign::Center;
        let attrs = ObjectAttrs::from_shape(&Shape::Text(text), None);
        assert_eq!(attrs.font_style.as_deref(), Some("italic bold"));
        assert_eq!(attrs.text_decoration.as_deref(), Some("underline"));

        let restored = shape_from_attrs(ShapeKind::Text, &attrs, false, None).unwrap();
        let restored = restored.as_text().unwrap();
        assert!(restored.bold && restored.italic && restored.underline);
        assert_eq!(restored.align, TextAlign::Center);
    }

    fn load_json(json: &str) -> LoadedDocument {
        let snapshot = DocumentSnapshot::from_json(json).unwrap();
        pollster::block_on(deserialize(&snapshot, &DataUrlLoader::new()))
    }

    #[test]
    fn test_malformed_colors_keep_defaults() {
        let loaded = load_json(
            r##"{"version": "1.0", "timestamp": 0, "canvasSize": {"width": 800, "height": 600},
                "objects": [
                    {"type": "rect", "attrs": {"fill": "#aé", "stroke": "#ééé"}},
                    {"type": "circle", "attrs": {"fill": "not-a-color", "stroke": "rgb(0, 0, 255)"}}
                ]}"##,
        );
        assert_eq!(loaded.document.len(), 2);
        let defaults = Rectangle::new(Point::ZERO, 1.0, 1.0).style;
        assert_eq!(loaded.document.objects()[0].style().fill, defaults.fill);
        assert_eq!(loaded.document.objects()[0].style().stroke, defaults.stroke);
        let circle = loaded.document.objects()[1].style();
        assert_eq!(circle.fill, Circle::new(Point::ZERO, 1.0).style.fill);
        assert_eq!(circle.stroke, Some(SerializableColor::blue()));
    }

    #[test]
    fn test_odd_point_list_drops_dangling_value() {
        let loaded = load_json(
            r##"{"version": "1.0", "timestamp": 0, "canvasSize": {"width": 800, "height": 600},
                "objects": [{"type": "line", "attrs": {"points": [0, 0, 10, 10, 5]}}]}"##,
        );
        match &loaded.document.objects()[0] {
            Shape::Line(line) => {
                assert_eq!(line.points, vec![Point::ZERO, Point::new(10.0, 10.0)]);
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_star_point_count_is_bounded() {
        let loaded = load_json(
            r##"{"version": "1.0", "timestamp": 0, "canvasSize": {"width": 800, "height": 600},
                "objects": [{"type": "star", "attrs": {"numPoints": 4294967295}}]}"##,
        );
        let star = &loaded.document.objects()[0];
        match star {
            Shape::Star(s) => assert_eq!(s.num_points, Star::MAX_POINTS),
            other => panic!("expected star, got {other:?}"),
        }
        assert!(star.hit_test(Point::ZERO, 0.0));
    }
}
