//! Gemini `generateContent` data transfer objects.
//!
//! Field names follow the REST API's camelCase JSON.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type (e.g., "image/png", "audio/L16;codec=pcm;rate=24000")
    mime_type: String,
    /// Base64-encoded bytes
    data: String,
}

impl InlineData {
    /// Wrap an already-encoded payload.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// One part of a content turn: text or inline data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Binary content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    /// A text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline data part.
    pub fn from_inline(data: InlineData) -> Self {
        Self {
            text: None,
            inline_data: Some(data),
        }
    }
}

/// A content turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// "user" or "model"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    /// Ordered parts
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    /// A user turn with the given parts.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

/// Image output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// "9:16", "16:9", or "1:1"
    aspect_ratio: String,
    /// "1K", "2K", or "4K"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_size: Option<String>,
}

impl ImageConfig {
    /// Settings for one image request.
    pub fn new(aspect_ratio: impl Into<String>, image_size: Option<String>) -> Self {
        Self {
            aspect_ratio: aspect_ratio.into(),
            image_size,
        }
    }
}

/// Named prebuilt voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    /// Voice name from the roster
    voice_name: String,
}

/// Voice selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    /// Prebuilt voice
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

/// Speech output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Voice selection
    voice_config: VoiceConfig,
}

impl SpeechConfig {
    /// Speak with the named prebuilt voice.
    pub fn prebuilt(voice_name: impl Into<String>) -> Self {
        Self {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: voice_name.into(),
                },
            },
        }
    }
}

/// The `generationConfig` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into), default)]
#[serde(rename_all = "camelCase")]
pub struct ContentConfig {
    /// Output modalities ("TEXT", "IMAGE", "AUDIO")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    response_modalities: Vec<String>,
    /// MIME type for text output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    /// JSON schema constraining text output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    /// Image output settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
    /// Speech output settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

impl ContentConfig {
    /// Creates a new builder.
    pub fn builder() -> ContentConfigBuilder {
        ContentConfigBuilder::default()
    }
}

/// Body of a `models/{model}:generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns
    contents: Vec<Content>,
    /// Output settings
    generation_config: ContentConfig,
}

impl GenerateContentRequest {
    /// A single-turn request.
    pub fn new(content: Content, generation_config: ContentConfig) -> Self {
        Self {
            contents: vec![content],
            generation_config,
        }
    }
}

/// One response candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    content: Content,
    /// Why generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finish_reason: Option<String>,
}

/// Body of a successful `generateContent` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates in ranked order
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, in order.
    pub fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .map(|c| c.content.parts.as_slice())
            .unwrap_or_default()
    }
}

/// The `error` object of a failed call.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) status: String,
}
