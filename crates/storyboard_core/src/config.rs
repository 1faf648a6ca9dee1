//! Layered TOML configuration.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (include_str! from storyboard.toml)
//! - ~/.config/storyboard/storyboard.toml
//! - ./storyboard.toml

use crate::{ResolutionTier, Voice};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use storyboard_error::{ConfigError, StoryboardError, StoryboardResult};
use tracing::{debug, instrument};

/// Model selection for the generation services.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model tried first for images
    pub primary_image_model: String,
    /// Model tried once after the primary fails
    pub fallback_image_model: String,
    /// Model used for story analysis
    pub analysis_model: String,
    /// Model used for speech synthesis
    pub speech_model: String,
    /// Output resolution for images
    pub resolution: ResolutionTier,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            primary_image_model: "gemini-3-pro-image-preview".to_string(),
            fallback_image_model: "gemini-2.5-flash-image".to_string(),
            analysis_model: "gemini-2.5-flash".to_string(),
            speech_model: "gemini-2.5-flash-preview-tts".to_string(),
            resolution: ResolutionTier::OneK,
        }
    }
}

/// Narration settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioConfig {
    /// PCM sample rate of the speech service
    pub sample_rate: u32,
    /// Voice used when none is requested
    pub default_voice: Voice,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            default_voice: Voice::Kore,
        }
    }
}

/// Playback heuristics.
///
/// # Examples
///
/// ```
/// use storyboard_core::PlaybackConfig;
///
/// let config = PlaybackConfig::default();
/// assert_eq!(config.fallback_duration_ms(50), 5000);
/// assert_eq!(config.fallback_duration_ms(200), 12_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Minimum time a segment without narration stays on screen
    pub fallback_min_ms: u64,
    /// Reading time per character of segment text
    pub fallback_ms_per_char: u64,
    /// Image cycle length when audio duration is unknown
    pub default_cycle_ms: u64,
    /// Inactivity before controls hide while playing
    pub controls_hide_delay_ms: u64,
    /// How long the media-error indicator stays visible
    pub media_error_indicator_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fallback_min_ms: 5_000,
            fallback_ms_per_char: 60,
            default_cycle_ms: 10_000,
            controls_hide_delay_ms: 3_000,
            media_error_indicator_ms: 3_000,
        }
    }
}

impl PlaybackConfig {
    /// Timer length for a segment played without audio.
    pub fn fallback_duration_ms(&self, text_len: usize) -> u64 {
        self.fallback_min_ms
            .max((text_len as u64).saturating_mul(self.fallback_ms_per_char))
    }
}

/// Top-level Storyboard configuration.
///
/// # Example
///
/// ```no_run
/// use storyboard_core::StoryboardConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryboardConfig::load()?;
/// println!("Primary model: {}", config.generation.primary_image_model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct StoryboardConfig {
    /// Generation models
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Narration
    #[serde(default)]
    pub audio: AudioConfig,
    /// Playback heuristics
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl StoryboardConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StoryboardResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> StoryboardResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../storyboard.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyboard/storyboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyboard").required(false));

        builder
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
