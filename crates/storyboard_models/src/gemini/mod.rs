//! Google Gemini integration.

mod client;
mod conversion;
mod dto;

pub use client::GeminiClient;
pub use conversion::{
    analysis_prompt, error_from_status, from_analysis_response, from_image_response,
    speech_payload, to_analysis_request, to_image_request, to_speech_request,
};
pub use dto::{
    Candidate, Content, ContentConfig, ContentConfigBuilder, GenerateContentRequest,
    GenerateContentResponse, ImageConfig, InlineData, Part, PrebuiltVoiceConfig, SpeechConfig,
    VoiceConfig,
};
