//! Test utilities for end-to-end pipeline tests.
//!
//! Stub services that answer instantly with fixed media.

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use storyboard::{
    GenerationRequest, GenerationResponse, ImageData, ImageGenerator, ResponsePart,
    SpeechSynthesizer, StoryboardResult, Voice,
};

/// A 30x30 composite with a distinct solid color per cell.
pub fn colored_grid() -> ImageData {
    let image = RgbImage::from_fn(30, 30, |x, y| {
        let index = ((y / 10) * 3 + x / 10) as u8;
        Rgb([index * 25, 200, 255 - index * 25])
    });
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode test grid");
    ImageData::png(buffer.into_inner())
}

/// Image generator that always answers with [`colored_grid`].
pub struct StubImageGenerator;

#[async_trait]
impl ImageGenerator for StubImageGenerator {
    async fn generate_image(
        &self,
        _req: &GenerationRequest,
    ) -> StoryboardResult<GenerationResponse> {
        Ok(GenerationResponse::new(vec![
            ResponsePart::Text("Contact sheet attached.".to_string()),
            ResponsePart::Image(colored_grid()),
        ]))
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

/// Speech synthesizer returning silence of a fixed length.
pub struct StubSpeech {
    /// Seconds of 24 kHz mono PCM to return
    pub seconds: usize,
}

#[async_trait]
impl SpeechSynthesizer for StubSpeech {
    async fn synthesize_speech(&self, _text: &str, _voice: Voice) -> StoryboardResult<Vec<u8>> {
        Ok(vec![0u8; self.seconds * 24_000 * 2])
    }
}
