//! Speech synthesis to a playable narration asset.

use crate::packager::package;
use storyboard_core::{AudioAsset, AudioConfig, Voice};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::{ApiAccess, SpeechSynthesizer};
use tracing::{info, instrument};

/// Narrates segment text through a [`SpeechSynthesizer`].
///
/// Shares the access flag with the image synthesizer: a permission failure
/// from the speech service revokes access for both.
pub struct NarrationService<S> {
    synthesizer: S,
    default_voice: Voice,
    access: ApiAccess,
}

impl<S> std::fmt::Debug for NarrationService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrationService")
            .field("default_voice", &self.default_voice)
            .finish_non_exhaustive()
    }
}

impl<S: SpeechSynthesizer> NarrationService<S> {
    /// Create a service with the configured default voice.
    pub fn new(synthesizer: S, config: &AudioConfig, access: ApiAccess) -> Self {
        Self {
            synthesizer,
            default_voice: config.default_voice,
            access,
        }
    }

    /// The underlying synthesizer.
    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// Synthesize `text` and package it as a WAV asset.
    ///
    /// Uses the default voice when `voice` is `None`. An empty response is a
    /// no-output error.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn narrate(&self, text: &str, voice: Option<Voice>) -> StoryboardResult<AudioAsset> {
        if !self.access.has_access() {
            return Err(GenerationError::new(GenerationErrorKind::AccessRevoked).into());
        }
        let voice = voice.unwrap_or(self.default_voice);

        let pcm = match self.synthesizer.synthesize_speech(text, voice).await {
            Ok(pcm) => pcm,
            Err(e) => {
                if e.generation_kind()
                    .is_some_and(GenerationErrorKind::is_permission_denied)
                {
                    self.access.revoke(&e.to_string());
                }
                return Err(e);
            }
        };
        if pcm.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::NoAudio).into());
        }

        let packaged = package(&pcm, self.synthesizer.sample_rate())?;
        info!(
            voice = %voice,
            bytes = packaged.container().len(),
            duration_seconds = *packaged.duration_seconds(),
            "Narration ready"
        );
        Ok(packaged.into_asset())
    }
}
