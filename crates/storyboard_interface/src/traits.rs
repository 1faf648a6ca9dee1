//! Collaborator traits.

use async_trait::async_trait;
use storyboard_core::{GenerationRequest, GenerationResponse, StoryBreakdown, Voice};
use storyboard_error::StoryboardResult;

/// The external image generation service.
///
/// One call per request; retries and model fallback are the caller's concern.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Run one generation call against `req.model()`.
    async fn generate_image(&self, req: &GenerationRequest) -> StoryboardResult<GenerationResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}

/// The external speech synthesis service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize narration, returning raw mono 16-bit PCM at the service rate.
    async fn synthesize_speech(&self, text: &str, voice: Voice) -> StoryboardResult<Vec<u8>>;

    /// Sample rate of the returned PCM.
    fn sample_rate(&self) -> u32 {
        24_000
    }
}

/// The external text analysis service.
#[async_trait]
pub trait StoryAnalyzer: Send + Sync {
    /// Break raw story text into characters, settings, and segments.
    async fn analyze(&self, text: &str, style_label: &str) -> StoryboardResult<StoryBreakdown>;
}
