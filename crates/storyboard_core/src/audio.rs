//! Narration audio assets.

use std::sync::Arc;
use uuid::Uuid;

/// Identity of one generated narration.
///
/// A fresh id is minted every time narration is generated, so playback can
/// tell "same audio re-entered" apart from "narration was replaced".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, derive_more::Display,
)]
pub struct AudioSourceId(Uuid);

impl AudioSourceId {
    /// Mint a new id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AudioSourceId {
    fn default() -> Self {
        Self::new()
    }
}

/// A playable narration container and its duration.
///
/// Immutable once created; replacing narration means creating a new asset.
///
/// # Examples
///
/// ```
/// use storyboard_core::AudioAsset;
///
/// let asset = AudioAsset::new(vec![0u8; 44], 0.0);
/// assert_eq!(asset.mime(), "audio/wav");
/// assert_eq!(asset.len(), 44);
/// ```
#[derive(Clone, PartialEq)]
pub struct AudioAsset {
    id: AudioSourceId,
    container: Arc<[u8]>,
    duration_seconds: f64,
}

impl AudioAsset {
    /// Wrap a packaged container with its duration.
    pub fn new(container: impl Into<Arc<[u8]>>, duration_seconds: f64) -> Self {
        Self {
            id: AudioSourceId::new(),
            container: container.into(),
            duration_seconds,
        }
    }

    /// Source identity.
    pub fn id(&self) -> AudioSourceId {
        self.id
    }

    /// Container bytes (WAV).
    pub fn container(&self) -> &[u8] {
        &self.container
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Container MIME type.
    pub fn mime(&self) -> &'static str {
        "audio/wav"
    }

    /// Container length in bytes.
    pub fn len(&self) -> usize {
        self.container.len()
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }
}

impl std::fmt::Debug for AudioAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioAsset")
            .field("id", &self.id)
            .field("len", &self.container.len())
            .field("duration_seconds", &self.duration_seconds)
            .finish()
    }
}
