//! Conversion between Storyboard types and Gemini DTOs.

use super::dto::{
    ApiErrorBody, Content, ContentConfig, GenerateContentRequest, GenerateContentResponse,
    ImageConfig, InlineData, Part, SpeechConfig,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use storyboard_core::{
    GenerationRequest, GenerationResponse, ImageData, ResponsePart, StoryBreakdown, Voice,
};
use storyboard_error::{BuilderError, GenerationError, GenerationErrorKind, StoryboardResult};
use tracing::{debug, warn};

/// Build an image request: reference images first, then the prompt.
///
/// # Examples
///
/// ```
/// use storyboard_core::{AspectRatio, GenerationRequest, ImageData};
/// use storyboard_models::to_image_request;
///
/// let request = GenerationRequest::builder()
///     .model("gemini-2.5-flash-image")
///     .prompt("A lighthouse")
///     .reference_images(vec![ImageData::png(vec![1, 2, 3])])
///     .aspect_ratio(AspectRatio::Landscape)
///     .build()
///     .unwrap();
///
/// let body = to_image_request(&request).unwrap();
/// let parts = body.contents()[0].parts();
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts[0].inline_data().as_ref().unwrap().data(), "AQID");
/// assert_eq!(parts[1].text().as_deref(), Some("A lighthouse"));
/// ```
pub fn to_image_request(request: &GenerationRequest) -> StoryboardResult<GenerateContentRequest> {
    let mut parts: Vec<Part> = request
        .reference_images()
        .iter()
        .map(|image| {
            Part::from_inline(InlineData::new(
                image.mime(),
                STANDARD.encode(image.bytes()),
            ))
        })
        .collect();
    parts.push(Part::from_text(request.prompt().clone()));

    let config = ContentConfig::builder()
        .response_modalities(vec!["TEXT".to_string(), "IMAGE".to_string()])
        .image_config(ImageConfig::new(
            request.aspect_ratio().to_string(),
            Some(request.resolution().to_string()),
        ))
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;

    Ok(GenerateContentRequest::new(Content::user(parts), config))
}

/// Convert a response into typed parts, decoding every embedded image.
///
/// Non-image inline payloads are skipped.
pub fn from_image_response(
    response: &GenerateContentResponse,
) -> StoryboardResult<GenerationResponse> {
    let mut parts = Vec::new();
    for part in response.first_parts() {
        if let Some(text) = part.text() {
            parts.push(ResponsePart::Text(text.clone()));
        }
        if let Some(inline) = part.inline_data() {
            if !inline.mime_type().starts_with("image/") {
                debug!(mime = %inline.mime_type(), "Skipping non-image inline data");
                continue;
            }
            let bytes = decode(inline.data())?;
            parts.push(ResponsePart::Image(ImageData::new(
                inline.mime_type().clone(),
                bytes,
            )));
        }
    }
    Ok(GenerationResponse::new(parts))
}

/// Build a text-to-speech request for one voice.
pub fn to_speech_request(text: &str, voice: Voice) -> StoryboardResult<GenerateContentRequest> {
    let config = ContentConfig::builder()
        .response_modalities(vec!["AUDIO".to_string()])
        .speech_config(SpeechConfig::prebuilt(voice.to_string()))
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;

    Ok(GenerateContentRequest::new(
        Content::user(vec![Part::from_text(text)]),
        config,
    ))
}

/// Extract the raw PCM from a speech response.
///
/// # Errors
///
/// `NoAudio` when no audio part is present or the payload is empty.
pub fn speech_payload(response: &GenerateContentResponse) -> StoryboardResult<Vec<u8>> {
    let inline = response
        .first_parts()
        .iter()
        .filter_map(|part| part.inline_data().as_ref())
        .find(|inline| inline.mime_type().starts_with("audio/"))
        .ok_or_else(|| GenerationError::new(GenerationErrorKind::NoAudio))?;

    let pcm = decode(inline.data())?;
    if pcm.is_empty() {
        return Err(GenerationError::new(GenerationErrorKind::NoAudio).into());
    }
    Ok(pcm)
}

/// The instruction sent with story text to the analysis model.
pub fn analysis_prompt(text: &str, style_label: &str) -> String {
    format!(
        "You are a storyboard artist. Break the story below into a visual storyboard \
         in the \"{style_label}\" style.\n\
         Return a title, a cinematic style descriptor, the recurring characters and \
         settings (each with an id, name, description, and a visual prompt for a \
         reference portrait), and the story split into short ordered segments.\n\
         For every segment give its text, the id of its setting, the ids of the \
         characters present, the time of day, the key visual action, and exactly nine \
         grid variations: distinct camera framings of the same moment for a 3x3 \
         contact sheet.\n\n\
         STORY:\n{text}"
    )
}

/// Build an analysis request constrained to the breakdown schema.
pub fn to_analysis_request(
    text: &str,
    style_label: &str,
) -> StoryboardResult<GenerateContentRequest> {
    let asset = json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "name": { "type": "STRING" },
            "description": { "type": "STRING" },
            "visualPrompt": { "type": "STRING" }
        },
        "required": ["id", "name", "description", "visualPrompt"]
    });
    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "cinematicStyle": { "type": "STRING" },
            "characters": { "type": "ARRAY", "items": asset.clone() },
            "settings": { "type": "ARRAY", "items": asset },
            "segments": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": { "type": "STRING" },
                        "settingId": { "type": "STRING" },
                        "characterIds": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "timeOfDay": { "type": "STRING" },
                        "keyVisualAction": { "type": "STRING" },
                        "gridVariations": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["text", "settingId", "characterIds", "keyVisualAction", "gridVariations"]
                }
            }
        },
        "required": ["title", "cinematicStyle", "characters", "settings", "segments"]
    });

    let config = ContentConfig::builder()
        .response_mime_type("application/json".to_string())
        .response_schema(schema)
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;

    Ok(GenerateContentRequest::new(
        Content::user(vec![Part::from_text(analysis_prompt(text, style_label))]),
        config,
    ))
}

/// Parse the JSON text of an analysis response.
pub fn from_analysis_response(
    response: &GenerateContentResponse,
) -> StoryboardResult<StoryBreakdown> {
    let text: String = response
        .first_parts()
        .iter()
        .filter_map(|part| part.text().as_deref())
        .collect();
    if text.trim().is_empty() {
        return Err(GenerationError::new(GenerationErrorKind::InvalidResponse(
            "analysis returned no text".to_string(),
        ))
        .into());
    }

    serde_json::from_str(&text).map_err(|e| {
        GenerationError::new(GenerationErrorKind::InvalidResponse(format!(
            "analysis JSON did not match the breakdown: {}",
            e
        )))
        .into()
    })
}

/// Classify a non-success response.
///
/// The JSON `error.status` field takes precedence over the HTTP code, so an
/// invalid key reported as `400 PERMISSION_DENIED` still revokes access.
///
/// # Examples
///
/// ```
/// use storyboard_models::error_from_status;
///
/// let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
/// let err = error_from_status(429, body);
/// assert!(err.kind.is_rate_limited());
/// assert!(err.kind.to_string().contains("Quota exceeded"));
/// ```
#[track_caller]
pub fn error_from_status(status_code: u16, body: &str) -> GenerationError {
    let (message, status) = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => (parsed.error.message, parsed.error.status),
        Err(_) => (body.to_string(), String::new()),
    };

    let kind = match status.as_str() {
        "PERMISSION_DENIED" | "UNAUTHENTICATED" => GenerationErrorKind::PermissionDenied(message),
        "RESOURCE_EXHAUSTED" => GenerationErrorKind::RateLimited(message),
        _ => GenerationErrorKind::from_status(status_code, message),
    };
    warn!(status_code, kind = %kind, "Gemini call failed");
    GenerationError::new(kind)
}

fn decode(data: &str) -> StoryboardResult<Vec<u8>> {
    STANDARD.decode(data).map_err(|e| {
        GenerationError::new(GenerationErrorKind::InvalidResponse(format!(
            "invalid base64 payload: {}",
            e
        )))
        .into()
    })
}
