//! Image payloads for comparison requests.
//!
//! Images are read fully into memory and base64-encoded; no size limit is
//! enforced and no decoding or resizing takes place. The MIME type sent to
//! the model is detected from the file signature, then the file extension,
//! and only falls back to JPEG when both are inconclusive.

use std::fmt;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Image formats accepted by vision chat models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ImageFormat {
    /// JPEG format (fallback).
    #[default]
    Jpeg,
    /// PNG format.
    Png,
    /// GIF format.
    Gif,
    /// WebP format.
    Webp,
}

impl ImageFormat {
    /// MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Detect format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, 0x50, 0x4E, 0x47, ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x47, 0x49, 0x46, 0x38, ..] => Some(Self::Gif),
            [0x52, 0x49, 0x46, 0x46, _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }

    /// Detect a format from content first, then from the name's extension.
    #[must_use]
    pub fn detect(bytes: &[u8], name: &str) -> Self {
        Self::from_magic_bytes(bytes)
            .or_else(|| {
                Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(Self::from_extension)
            })
            .unwrap_or_default()
    }
}

/// An image that has been base64-encoded for embedding in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    label: String,
    format: ImageFormat,
    data: String,
}

impl EncodedImage {
    /// Encode raw bytes, detecting the format from the bytes and label.
    ///
    /// The label is the name the prompt refers to, typically the file name.
    #[must_use]
    pub fn from_bytes(label: impl Into<String>, bytes: &[u8]) -> Self {
        let label = label.into();
        let format = ImageFormat::detect(bytes, &label);
        Self {
            label,
            format,
            data: BASE64.encode(bytes),
        }
    }

    /// Wrap an already base64-encoded payload.
    #[must_use]
    pub fn from_base64(
        label: impl Into<String>,
        format: ImageFormat,
        data: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            format,
            data: data.into(),
        }
    }

    /// Read and encode an image file.
    ///
    /// The label is the file name component of the path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if the file cannot be read.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::image(path, e))?;

        let label = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let image = Self::from_bytes(label, &bytes);
        debug!(
            path = %path.display(),
            bytes = bytes.len(),
            mime = image.format.mime_type(),
            "encoded image"
        );
        Ok(image)
    }

    /// Name used to refer to this image in the prompt.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Detected image format.
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// Base64 payload.
    #[must_use]
    pub fn base64(&self) -> &str {
        &self.data
    }

    /// Data URL form (`data:image/png;base64,...`).
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.data)
    }

    /// Decode the payload back into bytes.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the payload is not valid base64.
    pub fn decode(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Image: {}, ~{} bytes, {}]",
            self.label,
            self.data.len() * 3 / 4,
            self.format.mime_type()
        )
    }
}
