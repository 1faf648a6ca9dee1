//! Structured output of the story analysis service.

use crate::{AssetId, CELL_COUNT, Character, Segment, SegmentId, Setting, Story};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A character or setting as described by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOutline {
    /// Identifier referenced by segments
    pub id: String,
    /// Display name
    pub name: String,
    /// Prose description
    #[serde(default)]
    pub description: String,
    /// Prompt for the portrait
    #[serde(default)]
    pub visual_prompt: String,
}

/// A segment as described by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentOutline {
    /// Narrative text
    pub text: String,
    /// Setting reference
    pub setting_id: String,
    /// Character references
    #[serde(default)]
    pub character_ids: Vec<String>,
    /// Time-of-day label
    #[serde(default)]
    pub time_of_day: String,
    /// Key visual action
    #[serde(default)]
    pub key_visual_action: String,
    /// Nine cell descriptions
    #[serde(default)]
    pub grid_variations: Vec<String>,
}

/// Complete analyzer output.
///
/// # Examples
///
/// ```
/// use storyboard_core::StoryBreakdown;
///
/// let json = r#"{
///     "title": "The Lighthouse",
///     "cinematicStyle": "moody film noir",
///     "characters": [],
///     "settings": [{"id": "light", "name": "Lighthouse"}],
///     "segments": [{"text": "Waves crash.", "settingId": "light", "gridVariations": ["a", "b"]}]
/// }"#;
///
/// let breakdown: StoryBreakdown = serde_json::from_str(json).unwrap();
/// let story = breakdown.into_story("Noir");
/// assert_eq!(story.segments()[0].grid_variations().len(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryBreakdown {
    /// Title
    pub title: String,
    /// Cinematic style descriptor
    #[serde(default)]
    pub cinematic_style: String,
    /// Characters
    #[serde(default)]
    pub characters: Vec<AssetOutline>,
    /// Settings
    #[serde(default)]
    pub settings: Vec<AssetOutline>,
    /// Segments in narrative order
    pub segments: Vec<SegmentOutline>,
}

impl StoryBreakdown {
    /// Build a story, normalizing every segment to exactly nine variations.
    ///
    /// Missing variations are filled from the key visual action (or the
    /// segment text when that is empty); extra variations are dropped.
    pub fn into_story(self, style_label: impl Into<String>) -> Story {
        let characters = self
            .characters
            .into_iter()
            .map(|c| Character::new(c.id, c.name, c.description, c.visual_prompt))
            .collect();
        let settings = self
            .settings
            .into_iter()
            .map(|s| Setting::new(s.id, s.name, s.description, s.visual_prompt))
            .collect();
        let segments = self
            .segments
            .into_iter()
            .enumerate()
            .filter_map(|(position, outline)| outline.into_segment(position))
            .collect();

        Story::new(
            self.title,
            self.cinematic_style,
            style_label,
            characters,
            settings,
            segments,
        )
    }
}

impl SegmentOutline {
    fn into_segment(self, position: usize) -> Option<Segment> {
        let variations = normalize_variations(
            self.grid_variations,
            if self.key_visual_action.is_empty() {
                &self.text
            } else {
                &self.key_visual_action
            },
            position,
        );

        let built = Segment::builder()
            .id(SegmentId::generate())
            .text(self.text)
            .setting_id(AssetId::from(self.setting_id))
            .character_ids(
                self.character_ids
                    .into_iter()
                    .map(AssetId::from)
                    .collect::<Vec<_>>(),
            )
            .time_of_day(self.time_of_day)
            .key_visual_action(self.key_visual_action)
            .grid_variations(variations)
            .build();

        match built {
            Ok(segment) => Some(segment),
            Err(e) => {
                warn!(position, error = %e, "Dropping malformed segment outline");
                None
            }
        }
    }
}

fn normalize_variations(mut variations: Vec<String>, filler: &str, position: usize) -> Vec<String> {
    if variations.len() != CELL_COUNT {
        warn!(
            position,
            received = variations.len(),
            "Segment outline does not carry exactly nine grid variations"
        );
    }
    variations.truncate(CELL_COUNT);
    while variations.len() < CELL_COUNT {
        variations.push(filler.to_string());
    }
    variations
}
