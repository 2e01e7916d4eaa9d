//! Externally supplied starting documents, placeholder tags and canvas presets.

use crate::assets::{DecodeError, DecodedImage, ImageLoader};
use crate::canvas::CanvasSize;
use crate::shapes::{Shape, ShapeKind};
use crate::snapshot::{ObjectAttrs, shape_from_attrs};
use serde::{Deserialize, Serialize};

/// Placeholder tags every editor offers.
pub const BUILTIN_PLACEHOLDERS: [&str; 6] = [
    "{f_name}",
    "{e_mail}",
    "{address}",
    "{l_name}",
    "{ph_number}",
    "{id_no}",
];

/// One seed element of a template. Attributes sit next to `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub attrs: ObjectAttrs,
}

/// A read-only starting document: a preview image used as the background
/// and text seeds placed over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// Image reference decoded as the background on load.
    pub preview: String,
    #[serde(default)]
    pub elements: Vec<TemplateElement>,
}

impl Template {
    /// Build live objects from the seeds. Only text seeds are used; each
    /// gets a fresh id.
    pub fn materialize(&self) -> Vec<Shape> {
        self.elements
            .iter()
            .filter_map(|element| match ShapeKind::from_type_name(&element.kind) {
                Some(ShapeKind::Text) => {
                    shape_from_attrs(ShapeKind::Text, &element.attrs, false, None)
                }
                _ => {
                    log::debug!("Template {}: skipping {:?} seed", self.id, element.kind);
                    None
                }
            })
            .collect()
    }

    /// Decode the preview and materialize the seeds. Nothing is borrowed
    /// from the editor while the decode is pending.
    pub async fn load(&self, loader: &dyn ImageLoader) -> Result<LoadedTemplate, DecodeError> {
        let background = loader.decode(&self.preview).await.inspect_err(|e| {
            log::warn!("Template {} preview failed to decode: {}", self.id, e);
        })?;
        Ok(LoadedTemplate {
            name: self.name.clone(),
            background,
            objects: self.materialize(),
        })
    }
}

/// A template whose preview has been decoded, ready to replace the
/// document.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub name: String,
    pub background: DecodedImage,
    pub objects: Vec<Shape>,
}

/// Built-in placeholder tags followed by `custom`, with blanks and
/// duplicates dropped.
pub fn placeholder_catalog<S: AsRef<str>>(custom: &[S]) -> Vec<String> {
    let mut catalog: Vec<String> = Vec::with_capacity(BUILTIN_PLACEHOLDERS.len() + custom.len());
    let candidates = BUILTIN_PLACEHOLDERS
        .iter()
        .copied()
        .chain(custom.iter().map(|tag| tag.as_ref().trim()));
    for tag in candidates {
        if !tag.is_empty() && !catalog.iter().any(|existing| existing == tag) {
            catalog.push(tag.to_string());
        }
    }
    catalog
}

/// Named canvas sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasPreset {
    A1,
    A2,
    A3,
    A4,
    A5,
    Certificate,
    Normal,
}

impl CanvasPreset {
    pub fn all() -> &'static [CanvasPreset] {
        &[
            Self::A1,
            Self::A2,
            Self::A3,
            Self::A4,
            Self::A5,
            Self::Certificate,
            Self::Normal,
        ]
    }

    pub fn size(self) -> CanvasSize {
        let (width, height) = match self {
            Self::A1 => (841, 1189),
            Self::A2 => (594, 841),
            Self::A3 => (420, 594),
            Self::A4 => (297, 420),
            Self::A5 => (210, 297),
            Self::Certificate => (1123, 794),
            Self::Normal => (800, 600),
        };
        CanvasSize::new(width, height)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::A3 => "A3",
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::Certificate => "Certificate",
            Self::Normal => "Normal",
        }
    }
}
