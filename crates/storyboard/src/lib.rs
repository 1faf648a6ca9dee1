//! Storyboard - prose to narrated, synchronized storyboards.
//!
//! Storyboard breaks a story into segments, asks an image model for a 3x3
//! contact sheet per segment, lets the user pick cells from the sheet,
//! narrates each segment, and plays the result back with images cycling in
//! step with the narration.
//!
//! # Features
//!
//! - **Grid Synthesis**: One composite request per segment, with model fallback
//! - **Cell Selection**: Deterministic cell extraction and ordered toggling
//! - **Narration**: Speech synthesis packaged into self-describing WAV
//! - **Playback**: A deterministic synchronizer driven by a tokio task
//! - **Archives**: Zip project bundles with tolerant import
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use storyboard::{PlaybackConfig, import_from_path, playback_segments, simulate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = import_from_path("lighthouse.zip")?;
//! let segments = playback_segments(report.story());
//! for entry in simulate(segments, PlaybackConfig::default(), 600_000)? {
//!     println!("{:>8} ms  {:?}", entry.at_ms, entry.effect);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` - Google Gemini image, speech, and analysis clients
//! - `observability` - OpenTelemetry tracing bridge
//! - `all` - Enable all features
//!
//! # Architecture
//!
//! - `storyboard_error` - Error types
//! - `storyboard_core` - Story data model, typed requests, configuration
//! - `storyboard_interface` - Service traits and the access flag
//! - `storyboard_grid` - Cell extraction, selection, synthesis, workbench
//! - `storyboard_audio` - WAV packaging and narration
//! - `storyboard_playback` - Playback synchronizer and driver
//! - `storyboard_archive` - Project export/import
//! - `storyboard_models` - Provider clients
//!
//! This crate (`storyboard`) re-exports everything for convenience.

pub use storyboard_archive::*;
pub use storyboard_audio::*;
pub use storyboard_core::*;
pub use storyboard_error::*;
pub use storyboard_grid::*;
pub use storyboard_interface::*;
pub use storyboard_playback::*;

#[cfg(feature = "gemini")]
pub use storyboard_models::*;

#[cfg(feature = "observability")]
mod observability;

#[cfg(feature = "observability")]
pub use observability::{
    ObservabilityConfig, init_observability, init_observability_with_config,
    shutdown_observability,
};
