//! Encoded image payloads.

use std::sync::Arc;

/// An encoded image (PNG, JPEG, WebP) with its MIME type.
///
/// The bytes are reference-counted so that grid snapshots handed to
/// extraction tasks do not copy the composite.
///
/// # Examples
///
/// ```
/// use storyboard_core::ImageData;
///
/// let image = ImageData::png(vec![0x89, 0x50, 0x4E, 0x47]);
/// assert_eq!(image.mime(), "image/png");
/// assert_eq!(image.len(), 4);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageData {
    mime: String,
    bytes: Arc<[u8]>,
}

impl ImageData {
    /// Wrap encoded bytes with a MIME type.
    pub fn new(mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Wrap PNG bytes.
    pub fn png(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new("image/png", bytes)
    }

    /// MIME type.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the encoded bytes.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }

    /// MIME type guessed from a file extension.
    pub fn mime_for_extension(extension: &str) -> &'static str {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            _ => "image/png",
        }
    }
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}
