//! The `project.json` document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storyboard_core::{AssetId, CellIndex, SegmentId, Story};

/// Name of the manifest entry.
pub const MANIFEST_NAME: &str = "project.json";

/// Current manifest format.
pub const FORMAT_VERSION: u32 = 1;

/// Story metadata plus paths to its binary assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Format version
    pub version: u32,
    /// The story, without binary state
    pub story: Story,
    /// Per-segment assets
    #[serde(default)]
    pub segments: BTreeMap<SegmentId, SegmentAssets>,
    /// Character portrait paths
    #[serde(default)]
    pub characters: BTreeMap<AssetId, String>,
    /// Setting portrait paths
    #[serde(default)]
    pub settings: BTreeMap<AssetId, String>,
}

/// Assets of one segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentAssets {
    /// Composite grid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<String>,
    /// Selected cells, in selection order
    #[serde(default)]
    pub selection: Vec<SelectionEntry>,
    /// Narration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioEntry>,
}

/// One selected cell and its extracted image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    /// Cell position
    pub index: CellIndex,
    /// Path of the extracted image
    pub path: String,
}

/// Narration container and its duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioEntry {
    /// Path of the WAV container
    pub path: String,
    /// Duration in seconds
    pub duration_seconds: f64,
}
