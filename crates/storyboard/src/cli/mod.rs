//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyboard binary.

mod commands;
#[cfg(feature = "gemini")]
mod generate;
mod media;
mod project;

pub use commands::{Cli, Commands};
#[cfg(feature = "gemini")]
pub use generate::{analyze, narrate, synthesize};
pub use media::{extract, package_audio};
pub use project::{inspect, play};

/// Result of a command handler.
pub type CliResult = Result<(), Box<dyn std::error::Error>>;
