//! Narrated slideshow playback.
//!
//! [`PlaybackSynchronizer`] is a deterministic state machine: it consumes
//! [`PlaybackEvent`]s and a millisecond clock and emits [`PlaybackEffect`]s.
//! [`PlaybackDriver`] runs it on tokio against a [`MediaHost`], and
//! [`simulate`] runs it headless on a virtual clock.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod driver;
mod segment;
mod simulate;
mod state;
mod synchronizer;

pub use driver::{MediaHost, PlaybackDriver, PlaybackHandle};
pub use segment::{PlaybackSegment, playback_segments};
pub use simulate::{TimedEffect, simulate};
pub use state::{LoadTicket, PlaybackEffect, PlaybackEvent, PlaybackState};
pub use synchronizer::PlaybackSynchronizer;
