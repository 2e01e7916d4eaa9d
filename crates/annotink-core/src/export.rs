//! Flattened PNG export.

use crate::canvas::CanvasDocument;
use crate::render::{Rasterizer, RenderError};
use thiserror::Error;

/// Suggested download name for exported images.
pub const EXPORT_FILENAME: &str = "canvas-image.png";

/// Output pixels per canvas unit.
pub const EXPORT_PIXEL_RATIO: f64 = 2.0;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Raster buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// An encoded PNG ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngExport {
    pub filename: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Rasterize the document at [`EXPORT_PIXEL_RATIO`] and encode it as PNG.
pub fn export_png(
    document: &CanvasDocument,
    rasterizer: &dyn Rasterizer,
) -> Result<PngExport, ExportError> {
    let image = rasterizer.rasterize(document, EXPORT_PIXEL_RATIO)?;
    let expected = image.expected_len();
    if image.rgba.len() != expected {
        log::error!(
            "Rasterizer returned {} bytes for {}x{}",
            image.rgba.len(),
            image.width,
            image.height
        );
        return Err(ExportError::BufferSize {
            expected,
            actual: image.rgba.len(),
        });
    }

    let bytes = encode_png(&image.rgba, image.width, image.height)?;
    log::info!(
        "PNG export complete: {}x{}, {} bytes",
        image.width,
        image.height,
        bytes.len()
    );
    Ok(PngExport {
        filename: EXPORT_FILENAME,
        width: image.width,
        height: image.height,
        bytes,
    })
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }
    Ok(png_data)
}
