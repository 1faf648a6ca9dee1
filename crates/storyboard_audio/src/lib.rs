//! Audio packaging and narration.
//!
//! The speech service returns headerless PCM. [`package`] wraps it in a
//! RIFF/WAVE container that media hosts can play, and [`NarrationService`]
//! runs the whole speech-to-asset step for a segment.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod narration;
mod packager;

pub use narration::NarrationService;
pub use packager::{
    BITS_PER_SAMPLE, CHANNELS, PackagedAudio, WAV_HEADER_LEN, is_container, package, wav_header,
};
