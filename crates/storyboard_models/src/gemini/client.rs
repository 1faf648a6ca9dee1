//! Gemini REST client.

use super::conversion::{
    from_analysis_response, from_image_response, speech_payload, to_analysis_request,
    error_from_status, to_image_request, to_speech_request,
};
use super::dto::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::env;
use storyboard_core::{
    AudioConfig, GenerationConfig, GenerationRequest, GenerationResponse, StoryBreakdown, Voice,
};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::{ImageGenerator, SpeechSynthesizer, StoryAnalyzer};
use tracing::{debug, info, instrument};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini `generateContent` endpoint.
///
/// Implements image generation, speech synthesis, and story analysis.
/// Image calls address the model named in each request; speech and
/// analysis use the models from [`GenerationConfig`].
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    analysis_model: String,
    speech_model: String,
    sample_rate: u32,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("analysis_model", &self.analysis_model)
            .field("speech_model", &self.speech_model)
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client from the `GEMINI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// `MissingApiKey` when the variable is unset.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use storyboard_models::GeminiClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new")]
    pub fn new() -> StoryboardResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GenerationError::new(GenerationErrorKind::MissingApiKey))?;
        Ok(Self::with_api_key(api_key))
    }

    /// Create a client with an explicit key and default models.
    #[instrument(name = "gemini_client_with_api_key", skip_all)]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let generation = GenerationConfig::default();
        let audio = AudioConfig::default();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: generation.analysis_model,
            speech_model: generation.speech_model,
            sample_rate: audio.sample_rate,
        }
    }

    /// Use the configured analysis and speech models and sample rate.
    pub fn with_config(mut self, generation: &GenerationConfig, audio: &AudioConfig) -> Self {
        self.analysis_model = generation.analysis_model.clone();
        self.speech_model = generation.speech_model.clone();
        self.sample_rate = audio.sample_rate;
        self
    }

    /// Point the client at another endpoint (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The endpoint root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Model used for analysis.
    pub fn analysis_model(&self) -> &str {
        &self.analysis_model
    }

    /// Model used for speech.
    pub fn speech_model(&self) -> &str {
        &self.speech_model
    }

    /// URL of `generateContent` for one model.
    pub fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    #[instrument(skip(self, body))]
    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> StoryboardResult<GenerateContentResponse> {
        let url = self.endpoint(model);
        debug!(url = %url, "Sending Gemini API request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Transport(e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(error_from_status(status, &error_text).into());
        }

        response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::InvalidResponse(format!(
                "Failed to parse response: {}",
                e
            )))
            .into()
        })
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    #[instrument(skip(self, req), fields(model = %req.model(), grid_mode = req.grid_mode()))]
    async fn generate_image(&self, req: &GenerationRequest) -> StoryboardResult<GenerationResponse> {
        let body = to_image_request(req)?;
        let response = self.generate_content(req.model(), &body).await?;
        let converted = from_image_response(&response)?;
        info!(parts = converted.parts.len(), "Image response received");
        Ok(converted)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiClient {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn synthesize_speech(&self, text: &str, voice: Voice) -> StoryboardResult<Vec<u8>> {
        let body = to_speech_request(text, voice)?;
        let response = self.generate_content(&self.speech_model, &body).await?;
        let pcm = speech_payload(&response)?;
        info!(bytes = pcm.len(), "Speech response received");
        Ok(pcm)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[async_trait]
impl StoryAnalyzer for GeminiClient {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn analyze(&self, text: &str, style_label: &str) -> StoryboardResult<StoryBreakdown> {
        let body = to_analysis_request(text, style_label)?;
        let response = self.generate_content(&self.analysis_model, &body).await?;
        let breakdown = from_analysis_response(&response)?;
        info!(
            title = %breakdown.title,
            segments = breakdown.segments.len(),
            "Story analysis received"
        );
        Ok(breakdown)
    }
}
