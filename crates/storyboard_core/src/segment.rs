//! Narrative segments and their grid/selection/audio state.

use crate::{AssetId, AudioAsset, CENTER_CELL, CELL_COUNT, CellIndex, ImageData};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a segment.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct SegmentId(String);

impl SegmentId {
    /// Mint a random id.
    pub fn generate() -> Self {
        Self(format!("seg-{}", Uuid::new_v4().simple()))
    }

    /// String form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SegmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One narrative beat.
///
/// Binary state (grid, derived images, audio) is not serialized; the project
/// archive stores it as separate assets.
///
/// `selected_indices` and `generated_images` are only ever written together,
/// so they always have the same length.
///
/// # Examples
///
/// ```
/// use storyboard_core::Segment;
///
/// let segment = Segment::builder()
///     .id("seg-1")
///     .text("The ship leaves the harbor.")
///     .setting_id("harbor")
///     .build()
///     .unwrap();
///
/// assert!(segment.grid_image().is_none());
/// assert!(segment.selected_indices().is_empty());
/// assert_eq!(segment.grid_variations().len(), 9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct Segment {
    /// Identity
    id: SegmentId,
    /// Narrative text
    text: String,
    /// The one setting this segment takes place in
    setting_id: AssetId,
    /// Characters appearing in the segment
    #[builder(default)]
    #[serde(default)]
    character_ids: Vec<AssetId>,
    /// Time-of-day label
    #[builder(default)]
    #[serde(default)]
    time_of_day: String,
    /// Key visual action
    #[builder(default)]
    #[serde(default)]
    key_visual_action: String,
    /// One description per cell, row-major
    #[builder(default = "vec![String::new(); CELL_COUNT]")]
    grid_variations: Vec<String>,
    /// Composite 3x3 image once synthesized
    #[builder(default)]
    #[serde(skip)]
    grid_image: Option<ImageData>,
    /// Chosen cells in selection order
    ///
    /// Not serialized: indices travel with their images (see [`Segment::restore`]).
    #[builder(setter(skip))]
    #[serde(skip)]
    selected_indices: Vec<CellIndex>,
    /// Extracted cell images, positionally matching `selected_indices`
    #[builder(setter(skip))]
    #[serde(skip)]
    generated_images: Vec<ImageData>,
    /// Narration, if generated
    #[builder(setter(skip))]
    #[serde(skip)]
    audio: Option<AudioAsset>,
    /// A synthesis is in flight
    #[builder(setter(skip))]
    #[serde(skip)]
    is_generating: bool,
}

impl Segment {
    /// Creates a new builder.
    pub fn builder() -> SegmentBuilder {
        SegmentBuilder::default()
    }

    /// Text length in characters, as used by the reading-speed heuristic.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether a composite grid exists.
    pub fn has_grid(&self) -> bool {
        self.grid_image.is_some()
    }

    /// Narration duration, if narration exists.
    pub fn audio_duration(&self) -> Option<f64> {
        self.audio.as_ref().map(AudioAsset::duration_seconds)
    }

    /// Replace the composite grid and reset the selection to the center cell.
    pub fn replace_grid(&mut self, grid: ImageData, center: ImageData) {
        self.grid_image = Some(grid);
        self.selected_indices = vec![CENTER_CELL];
        self.generated_images = vec![center];
    }

    /// Publish a complete selection with its extracted images.
    pub fn publish_selection(&mut self, selection: Vec<(CellIndex, ImageData)>) {
        let (indices, images) = selection.into_iter().unzip();
        self.selected_indices = indices;
        self.generated_images = images;
    }

    /// Restore binary state after deserialization.
    ///
    /// Grid and selection are restored without the center-cell reset.
    pub fn restore(
        &mut self,
        grid: Option<ImageData>,
        selection: Vec<(CellIndex, ImageData)>,
        audio: Option<AudioAsset>,
    ) {
        self.grid_image = grid;
        self.publish_selection(selection);
        self.audio = audio;
    }

    /// Mark whether a synthesis is in flight.
    pub fn set_generating(&mut self, generating: bool) {
        self.is_generating = generating;
    }

    /// Attach (or replace) narration.
    pub fn attach_audio(&mut self, audio: AudioAsset) {
        self.audio = Some(audio);
    }

    /// Remove narration, returning it.
    pub fn remove_audio(&mut self) -> Option<AudioAsset> {
        self.audio.take()
    }

    /// Replace the nine grid variations.
    pub fn set_grid_variations(&mut self, variations: Vec<String>) {
        self.grid_variations = variations;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> Segment {
        Segment::builder()
            .id("seg-1")
            .text("Night falls.")
            .setting_id("forest")
            .build()
            .unwrap()
    }

    #[test]
    fn replace_grid_resets_to_center() {
        let mut seg = segment();
        seg.publish_selection(vec![
            (CellIndex::new(0).unwrap(), ImageData::png(vec![0])),
            (CellIndex::new(8).unwrap(), ImageData::png(vec![8])),
        ]);

        seg.replace_grid(ImageData::png(vec![9, 9]), ImageData::png(vec![4]));

        assert_eq!(seg.selected_indices(), &vec![CENTER_CELL]);
        assert_eq!(seg.generated_images().len(), 1);
        assert!(seg.has_grid());
    }

    #[test]
    fn binary_state_is_not_serialized() {
        let mut seg = segment();
        seg.replace_grid(ImageData::png(vec![1]), ImageData::png(vec![2]));
        seg.attach_audio(AudioAsset::new(vec![0u8; 48], 0.0));

        let json = serde_json::to_value(&seg).unwrap();
        assert!(json.get("grid_image").is_none());
        assert!(json.get("audio").is_none());
        assert!(json.get("selected_indices").is_none());
        assert!(json.get("generated_images").is_none());
    }

    #[test]
    fn deserialized_segment_has_consistent_selection() {
        let mut seg = segment();
        seg.replace_grid(ImageData::png(vec![1]), ImageData::png(vec![2]));

        let json = serde_json::to_string(&seg).unwrap();
        let mut restored: Segment = serde_json::from_str(&json).unwrap();
        assert!(restored.selected_indices().is_empty());
        assert!(restored.generated_images().is_empty());

        restored.restore(None, vec![(CENTER_CELL, ImageData::png(vec![2]))], None);
        assert_eq!(restored.selected_indices(), &vec![CENTER_CELL]);
        assert_eq!(restored.generated_images().len(), 1);
    }

    #[test]
    fn text_len_counts_characters() {
        let seg = Segment::builder()
            .id("s")
            .text("héllo")
            .setting_id("x")
            .build()
            .unwrap();
        assert_eq!(seg.text_len(), 5);
    }
}
