//! Error types for the Storyboard pipeline.
//!
//! This crate provides the error types used throughout the Storyboard workspace.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storyboard_error::{DecodeError, DecodeErrorKind, StoryboardResult};
//!
//! fn load_grid() -> StoryboardResult<Vec<u8>> {
//!     Err(DecodeError::new(DecodeErrorKind::Image("truncated PNG".to_string())))?
//! }
//!
//! match load_grid() {
//!     Ok(bytes) => println!("Got {} bytes", bytes.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod audio;
mod builder;
mod config;
mod decode;
mod error;
mod generation;
mod json;
mod playback;
mod selection;

pub use archive::{ArchiveError, ArchiveErrorKind};
pub use audio::{AudioError, AudioErrorKind};
pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use decode::{DecodeError, DecodeErrorKind};
pub use error::{StoryboardError, StoryboardErrorKind, StoryboardResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use playback::{PlaybackError, PlaybackErrorKind};
pub use selection::{SelectionError, SelectionErrorKind};
