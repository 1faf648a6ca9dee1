//! Generation service clients for Storyboard.
//!
//! Each provider lives behind its own feature flag and implements the
//! collaborator traits from `storyboard_interface`.
//!
//! # Available Providers
//!
//! - **Gemini** (Google) - Enable with `gemini` feature
//!
//! # Example
//!
//! ```toml
//! [dependencies]
//! storyboard_models = { version = "0.1", features = ["gemini"] }
//! ```
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use storyboard_core::Voice;
//! use storyboard_interface::SpeechSynthesizer;
//! use storyboard_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()?;
//! let pcm = client.synthesize_speech("Waves crash.", Voice::Kore).await?;
//! println!("{} bytes of PCM", pcm.len());
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{
    Candidate, Content, ContentConfig, ContentConfigBuilder, GeminiClient,
    GenerateContentRequest, GenerateContentResponse, ImageConfig, InlineData, Part,
    PrebuiltVoiceConfig, SpeechConfig, VoiceConfig, analysis_prompt, error_from_status,
    from_analysis_response, from_image_response, speech_payload, to_analysis_request,
    to_image_request, to_speech_request,
};
