//! Trait definitions for the external services the pipeline talks to.
//!
//! Implementations live in `storyboard_models`; tests substitute mocks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod access;
mod traits;

pub use access::ApiAccess;
pub use traits::{ImageGenerator, SpeechSynthesizer, StoryAnalyzer};
