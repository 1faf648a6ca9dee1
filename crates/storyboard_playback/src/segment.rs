//! What playback needs from a segment.

use derive_getters::Getters;
use storyboard_core::{AudioAsset, ImageData, Segment, SegmentId, Story};

/// A segment as seen by playback: its text length, published images, and
/// optional narration.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct PlaybackSegment {
    /// Source segment
    id: SegmentId,
    /// Text length in characters
    text_len: usize,
    /// Images in selection order
    images: Vec<ImageData>,
    /// Narration
    audio: Option<AudioAsset>,
}

impl PlaybackSegment {
    /// Assemble a playback segment.
    pub fn new(
        id: impl Into<SegmentId>,
        text_len: usize,
        images: Vec<ImageData>,
        audio: Option<AudioAsset>,
    ) -> Self {
        Self {
            id: id.into(),
            text_len,
            images,
            audio,
        }
    }
}

impl From<&Segment> for PlaybackSegment {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id().clone(),
            text_len: segment.text_len(),
            images: segment.generated_images().clone(),
            audio: segment.audio().clone(),
        }
    }
}

/// Snapshot every segment of a story, in narrative order.
pub fn playback_segments(story: &Story) -> Vec<PlaybackSegment> {
    story.segments().iter().map(PlaybackSegment::from).collect()
}
