//! Test utilities for audio tests.

pub mod mock_speech;

#[allow(unused_imports)]
pub use mock_speech::MockSpeechSynthesizer;
