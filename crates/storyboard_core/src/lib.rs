//! Core data types for the Storyboard pipeline.
//!
//! This crate provides the story/segment data model shared by the grid,
//! audio, playback, and archive crates, the typed generation request and
//! response, and the layered TOML configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod audio;
mod cell;
mod config;
mod media;
mod request;
mod segment;
mod story;
mod voice;

pub use analysis::{AssetOutline, SegmentOutline, StoryBreakdown};
pub use audio::{AudioAsset, AudioSourceId};
pub use cell::{CENTER_CELL, CELL_COUNT, CellIndex, GRID_SIDE};
pub use config::{AudioConfig, GenerationConfig, PlaybackConfig, StoryboardConfig};
pub use media::ImageData;
pub use request::{
    AspectRatio, GenerationRequest, GenerationRequestBuilder, GenerationResponse, ResolutionTier,
    ResponsePart,
};
pub use segment::{Segment, SegmentId};
pub use story::{AssetId, Character, Setting, Story};
pub use voice::Voice;
