//! Image references: decoding data URIs and uploading to a remote host.
//!
//! Pixel buffers belong to the render layer. The model only ever sees a
//! [`DecodedImage`], which records the reference and its pixel size once
//! the reference is known to decode.

use crate::storage::BoxFuture;
use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Environment variable holding the asset host API key.
pub const ASSET_API_KEY_VAR: &str = "ANNOTINK_ASSET_API_KEY";
/// Environment variable holding the asset host API secret.
pub const ASSET_API_SECRET_VAR: &str = "ANNOTINK_ASSET_API_SECRET";

/// Image decoding errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("Malformed data URL")]
    MalformedDataUrl,
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Image decode failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Asset upload errors.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Asset host credentials missing: {0}")]
    MissingCredentials(&'static str),
    #[error("Upload rejected: {0}")]
    Rejected(String),
    #[error("Upload transport error: {0}")]
    Transport(String),
}

/// Raster formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// An image reference that is known to decode, with its pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Data URI or remote URL.
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Whether `source` is an inline `data:` URI.
pub fn is_data_url(source: &str) -> bool {
    source.starts_with("data:")
}

/// Split a base64 data URI into its MIME type and raw bytes.
pub fn decode_data_url(source: &str) -> Result<(String, Vec<u8>), DecodeError> {
    let rest = source
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::UnsupportedSource(source.chars().take(32).collect()))?;
    let (meta, payload) = rest.split_once(',').ok_or(DecodeError::MalformedDataUrl)?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or(DecodeError::MalformedDataUrl)?;
    let bytes = STANDARD.decode(payload.trim())?;
    Ok((mime.to_string(), bytes))
}

/// Encode bytes as a base64 data URI. The MIME type is sniffed from the
/// bytes, falling back to `application/octet-stream`.
pub fn encode_data_url(bytes: &[u8]) -> String {
    let mime = ImageFormat::from_magic_bytes(bytes)
        .map(|f| f.mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Asynchronous image decoder.
///
/// Hosts that fetch remote URLs provide their own implementation; the
/// bundled [`DataUrlLoader`] only handles inline data URIs.
pub trait ImageLoader {
    fn decode<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<DecodedImage, DecodeError>>;
}

/// Decodes `data:` URIs in process with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUrlLoader;

impl DataUrlLoader {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous decode, shared by the async trait method.
    pub fn decode_now(&self, source: &str) -> Result<DecodedImage, DecodeError> {
        if !is_data_url(source) {
            return Err(DecodeError::UnsupportedSource(
                source.chars().take(64).collect(),
            ));
        }
        let (_mime, bytes) = decode_data_url(source)?;
        let image = image::load_from_memory(&bytes)?;
        Ok(DecodedImage {
            source: source.to_string(),
            width: image.width(),
            height: image.height(),
        })
    }
}

impl ImageLoader for DataUrlLoader {
    fn decode<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<DecodedImage, DecodeError>> {
        Box::pin(async move { self.decode_now(source) })
    }
}

/// Remote file host used to publish background images on save.
pub trait AssetHost {
    /// Upload `bytes` under `title` and return the public URL.
    fn upload<'a>(&'a self, bytes: Vec<u8>, title: &'a str)
    -> BoxFuture<'a, Result<String, UploadError>>;
}

/// Credentials for the remote asset host.
#[derive(Clone, PartialEq, Eq)]
pub struct AssetHostConfig {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for AssetHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetHostConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl AssetHostConfig {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, UploadError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UploadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(UploadError::MissingCredentials(name))
        };
        Ok(Self {
            api_key: read(ASSET_API_KEY_VAR)?,
            api_secret: read(ASSET_API_SECRET_VAR)?,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::png_data_url;
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBP"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), None);
    }

    #[test]
    fn test_decode_png_data_url() {
        let url = png_data_url(3, 2);
        assert!(url.starts_with("data:image/png;base64,"));
        let decoded = DataUrlLoader::new().decode_now(&url).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.source, url);
    }

    #[test]
    fn test_decode_async() {
        let url = png_data_url(1, 1);
        let loader = DataUrlLoader::new();
        let decoded = pollster::block_on(loader.decode(&url)).unwrap();
        assert_eq!(decoded.width, 1);
    }

    #[test]
    fn test_remote_url_is_unsupported() {
        let err = DataUrlLoader::new()
            .decode_now("https://media.example.com/bg.png")
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedSource(_)));
    }

    #[test]
    fn test_garbage_payload_fails() {
        let err = DataUrlLoader::new()
            .decode_now("data:image/png;base64,AAAA")
            .unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));

        let err = decode_data_url("data:image/png,plain").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedDataUrl));
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ASSET_API_KEY_VAR, "key"),
            (ASSET_API_SECRET_VAR, "secret"),
        ]
        .into_iter()
        .collect();
        let config = AssetHostConfig::from_lookup(|n| vars.get(n).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_key, "key");
        assert!(!format!("{config:?}").contains("\"secret\""));

        let err = AssetHostConfig::from_lookup(|n| {
            (n == ASSET_API_KEY_VAR).then(|| "key".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, UploadError::MissingCredentials(ASSET_API_SECRET_VAR)));
    }
}
