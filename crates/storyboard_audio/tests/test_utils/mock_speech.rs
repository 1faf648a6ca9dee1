//! Mock speech synthesizer for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use storyboard_core::Voice;
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardError, StoryboardResult};
use storyboard_interface::SpeechSynthesizer;

/// Mock speech synthesizer that returns a fixed PCM buffer or error.
pub struct MockSpeechSynthesizer {
    result: Result<Vec<u8>, GenerationErrorKind>,
    voices: Arc<Mutex<Vec<Voice>>>,
}

impl MockSpeechSynthesizer {
    /// Always return `pcm`.
    pub fn new_success(pcm: Vec<u8>) -> Self {
        Self {
            result: Ok(pcm),
            voices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always fail with `error`.
    pub fn new_error(error: GenerationErrorKind) -> Self {
        Self {
            result: Err(error),
            voices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Voices requested, in order.
    pub fn voices(&self) -> Vec<Voice> {
        self.voices.lock().unwrap().clone()
    }

    /// Number of synthesize calls.
    pub fn call_count(&self) -> usize {
        self.voices.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize_speech(&self, _text: &str, voice: Voice) -> StoryboardResult<Vec<u8>> {
        self.voices.lock().unwrap().push(voice);
        match &self.result {
            Ok(pcm) => Ok(pcm.clone()),
            Err(kind) => Err(StoryboardError::from(GenerationError::new(kind.clone()))),
        }
    }
}
