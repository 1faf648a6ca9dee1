//! Stories, characters, and settings.

use crate::{ImageData, Segment, SegmentId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Identity of a character or setting.
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
pub struct AssetId(String);

impl AssetId {
    /// String form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A recurring character.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct Character {
    id: AssetId,
    name: String,
    description: String,
    visual_prompt: String,
    #[serde(skip)]
    portrait: Option<ImageData>,
}

/// A location scenes take place in.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct Setting {
    id: AssetId,
    name: String,
    description: String,
    visual_prompt: String,
    #[serde(skip)]
    portrait: Option<ImageData>,
}

macro_rules! asset_impl {
    ($ty:ident) => {
        impl $ty {
            /// Create an asset without a portrait.
            pub fn new(
                id: impl Into<AssetId>,
                name: impl Into<String>,
                description: impl Into<String>,
                visual_prompt: impl Into<String>,
            ) -> Self {
                Self {
                    id: id.into(),
                    name: name.into(),
                    description: description.into(),
                    visual_prompt: visual_prompt.into(),
                    portrait: None,
                }
            }

            /// Attach or clear the generated portrait.
            pub fn set_portrait(&mut self, portrait: Option<ImageData>) {
                self.portrait = portrait;
            }
        }
    };
}

asset_impl!(Character);
asset_impl!(Setting);

/// A complete storyboard project.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct Story {
    /// Title
    title: String,
    /// Cinematic style descriptor applied to every generation
    cinematic_style: String,
    /// Style label the story was analyzed with
    style_label: String,
    /// Characters
    characters: Vec<Character>,
    /// Settings
    settings: Vec<Setting>,
    /// Segments in narrative order
    segments: Vec<Segment>,
}

impl Story {
    /// Assemble a story.
    pub fn new(
        title: impl Into<String>,
        cinematic_style: impl Into<String>,
        style_label: impl Into<String>,
        characters: Vec<Character>,
        settings: Vec<Setting>,
        segments: Vec<Segment>,
    ) -> Self {
        Self {
            title: title.into(),
            cinematic_style: cinematic_style.into(),
            style_label: style_label.into(),
            characters,
            settings,
            segments,
        }
    }

    /// Look up a segment.
    pub fn segment(&self, id: &SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id() == id)
    }

    /// Look up a segment mutably.
    pub fn segment_mut(&mut self, id: &SegmentId) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.id() == id)
    }

    /// Mutable access to all segments.
    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    /// Look up a character.
    pub fn character(&self, id: &crate::AssetId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id() == id)
    }

    /// Look up a character mutably.
    pub fn character_mut(&mut self, id: &crate::AssetId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id() == id)
    }

    /// Look up a setting.
    pub fn setting(&self, id: &crate::AssetId) -> Option<&Setting> {
        self.settings.iter().find(|s| s.id() == id)
    }

    /// Look up a setting mutably.
    pub fn setting_mut(&mut self, id: &crate::AssetId) -> Option<&mut Setting> {
        self.settings.iter_mut().find(|s| s.id() == id)
    }

    /// Portraits available as references for a segment: its setting first,
    /// then its characters in order.
    pub fn reference_images(&self, segment: &Segment) -> Vec<ImageData> {
        let setting = self
            .setting(segment.setting_id())
            .and_then(|s| s.portrait().clone());
        let characters = segment
            .character_ids()
            .iter()
            .filter_map(|id| self.character(id))
            .filter_map(|c| c.portrait().clone());
        setting.into_iter().chain(characters).collect()
    }
}
