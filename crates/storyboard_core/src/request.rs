//! Typed request and response for the image generation service.

use crate::ImageData;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Output aspect ratio.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
pub enum AspectRatio {
    /// Vertical frames (grids, character portraits)
    #[strum(serialize = "9:16")]
    #[serde(rename = "9:16")]
    Portrait,
    /// Horizontal frames (settings)
    #[strum(serialize = "16:9")]
    #[serde(rename = "16:9")]
    Landscape,
    /// Square frames
    #[strum(serialize = "1:1")]
    #[serde(rename = "1:1")]
    Square,
}

/// Requested output resolution.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum ResolutionTier {
    /// ~1024px
    #[default]
    #[strum(serialize = "1K")]
    #[serde(rename = "1K")]
    OneK,
    /// ~2048px
    #[strum(serialize = "2K")]
    #[serde(rename = "2K")]
    TwoK,
    /// ~4096px
    #[strum(serialize = "4K")]
    #[serde(rename = "4K")]
    FourK,
}

/// One call to the image generation service.
///
/// # Examples
///
/// ```
/// use storyboard_core::{AspectRatio, GenerationRequest};
///
/// let request = GenerationRequest::builder()
///     .model("gemini-2.5-flash-image")
///     .prompt("A lighthouse at dusk")
///     .aspect_ratio(AspectRatio::Portrait)
///     .grid_mode(true)
///     .build()
///     .unwrap();
///
/// assert!(request.grid_mode());
/// assert!(request.reference_images().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// Model identifier
    model: String,
    /// Full prompt text
    prompt: String,
    /// Auxiliary reference images (characters, settings)
    #[builder(default)]
    reference_images: Vec<ImageData>,
    /// Output aspect ratio
    aspect_ratio: AspectRatio,
    /// Output resolution
    #[builder(default)]
    resolution: ResolutionTier,
    /// Global style text
    #[builder(default)]
    style: String,
    /// Whether the output is a 3x3 contact sheet
    #[builder(default)]
    grid_mode: bool,
}

impl GenerationRequest {
    /// Creates a new builder.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// The same request addressed to another model.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..self.clone()
        }
    }
}

/// One part of a generation response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    /// Commentary text
    Text(String),
    /// Embedded image
    Image(ImageData),
}

/// Response from the image generation service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationResponse {
    /// Parts in the order the service returned them
    pub parts: Vec<ResponsePart>,
}

impl GenerationResponse {
    /// Wrap parts.
    pub fn new(parts: Vec<ResponsePart>) -> Self {
        Self { parts }
    }

    /// The first embedded image, if any. Later images are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::{GenerationResponse, ImageData, ResponsePart};
    ///
    /// let response = GenerationResponse::new(vec![
    ///     ResponsePart::Text("Here you go".to_string()),
    ///     ResponsePart::Image(ImageData::png(vec![1])),
    ///     ResponsePart::Image(ImageData::png(vec![2])),
    /// ]);
    /// assert_eq!(response.into_first_image().unwrap().bytes(), &[1]);
    /// ```
    pub fn into_first_image(self) -> Option<ImageData> {
        self.parts.into_iter().find_map(|part| match part {
            ResponsePart::Image(image) => Some(image),
            ResponsePart::Text(_) => None,
        })
    }
}
