//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
#[cfg(feature = "gemini")]
use storyboard::Voice;

/// Storyboard - narrated storyboards from prose
#[derive(Parser, Debug)]
#[command(name = "storyboard")]
#[command(about = "Grid synthesis, cell selection, narration, and synchronized playback", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Load configuration from this file instead of the layered defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crop one cell out of a 3x3 contact sheet
    Extract {
        /// Path to the composite grid image
        #[arg(long)]
        grid: PathBuf,

        /// Cell index, row-major (0-8)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=8))]
        index: u8,

        /// Where to write the cell PNG
        #[arg(long)]
        out: PathBuf,
    },

    /// Wrap raw 16-bit mono PCM in a WAV container
    PackageAudio {
        /// Path to the raw PCM (or an existing WAV)
        #[arg(long)]
        pcm: PathBuf,

        /// Where to write the WAV file
        #[arg(long)]
        out: PathBuf,

        /// Sample rate of the PCM (defaults to the configured rate)
        #[arg(long)]
        sample_rate: Option<u32>,
    },

    /// List the segments, assets, and import warnings of a project archive
    Inspect {
        /// Path to the project archive
        #[arg(long)]
        archive: PathBuf,
    },

    /// Play a project archive on a virtual clock and print the transitions
    Play {
        /// Path to the project archive
        #[arg(long)]
        archive: PathBuf,

        /// Stop the simulation after this many milliseconds
        #[arg(long, default_value = "3600000")]
        limit_ms: u64,
    },

    /// Analyze a story and write a new project archive
    #[cfg(feature = "gemini")]
    Analyze {
        /// Path to the story text
        #[arg(long)]
        text: PathBuf,

        /// Style label (e.g., "Noir", "Watercolor")
        #[arg(long, default_value = "Cinematic")]
        style: String,

        /// Where to write the project archive
        #[arg(long)]
        out: PathBuf,
    },

    /// Generate a grid for one segment and select its center cell
    #[cfg(feature = "gemini")]
    Synthesize {
        /// Path to the project archive (rewritten in place)
        #[arg(long)]
        archive: PathBuf,

        /// Zero-based segment position
        #[arg(long)]
        segment: usize,

        /// Generate missing character and setting portraits first
        #[arg(long)]
        portraits: bool,
    },

    /// Narrate one segment and attach the audio
    #[cfg(feature = "gemini")]
    Narrate {
        /// Path to the project archive (rewritten in place)
        #[arg(long)]
        archive: PathBuf,

        /// Zero-based segment position
        #[arg(long)]
        segment: usize,

        /// Voice from the roster (defaults to the configured voice)
        #[arg(long)]
        voice: Option<Voice>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_parses() {
        let cli = Cli::try_parse_from([
            "storyboard",
            "extract",
            "--grid",
            "sheet.png",
            "--index",
            "4",
            "--out",
            "cell.png",
        ])
        .expect("valid arguments");

        match cli.command {
            Commands::Extract { grid, index, out } => {
                assert_eq!(grid, PathBuf::from("sheet.png"));
                assert_eq!(index, 4);
                assert_eq!(out, PathBuf::from("cell.png"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_extract_rejects_index_nine() {
        let result = Cli::try_parse_from([
            "storyboard", "extract", "--grid", "a.png", "--index", "9", "--out", "b.png",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "storyboard",
            "play",
            "--archive",
            "story.zip",
            "--verbose",
            "--config",
            "custom.toml",
        ])
        .expect("valid arguments");

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Commands::Play { limit_ms, .. } => assert_eq!(limit_ms, 3_600_000),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_package_audio_rate_is_optional() {
        let cli = Cli::try_parse_from([
            "storyboard", "package-audio", "--pcm", "a.pcm", "--out", "a.wav",
        ])
        .expect("valid arguments");

        match cli.command {
            Commands::PackageAudio { sample_rate, .. } => assert_eq!(sample_rate, None),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[cfg(feature = "gemini")]
    #[test]
    fn test_narrate_parses_voice() {
        let cli = Cli::try_parse_from([
            "storyboard", "narrate", "--archive", "a.zip", "--segment", "2", "--voice", "Puck",
        ])
        .expect("valid arguments");

        match cli.command {
            Commands::Narrate { segment, voice, .. } => {
                assert_eq!(segment, 2);
                assert_eq!(voice, Some(Voice::Puck));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
