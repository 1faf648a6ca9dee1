//! Storyboard CLI binary.
//!
//! This binary provides command-line access to Storyboard's pipeline:
//! - Extract cells from contact sheets and package narration audio
//! - Inspect and simulate playback of project archives
//! - Analyze, illustrate, and narrate stories (with the `gemini` feature)

use clap::Parser;
use storyboard::StoryboardConfig;

mod cli;

fn init_tracing(cli: &cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = if cli.verbose { "debug" } else { "info" };

    #[cfg(feature = "observability")]
    {
        storyboard::init_observability_with_config(
            storyboard::ObservabilityConfig::new("storyboard")
                .with_log_level(level)
                .with_json_logs(cli.json_logs),
        )
    }

    #[cfg(not(feature = "observability"))]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr);
        if cli.json_logs {
            builder.json().try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
        } else {
            builder.try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, extract, inspect, package_audio, play};
    #[cfg(feature = "gemini")]
    use cli::{analyze, narrate, synthesize};

    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = match &cli.config {
        Some(path) => StoryboardConfig::from_file(path)?,
        None => StoryboardConfig::load()?,
    };
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Extract { grid, index, out } => extract(&grid, index, &out),

        Commands::PackageAudio {
            pcm,
            out,
            sample_rate,
        } => package_audio(&pcm, &out, sample_rate.unwrap_or(config.audio.sample_rate)),

        Commands::Inspect { archive } => inspect(&archive),

        Commands::Play { archive, limit_ms } => play(&archive, limit_ms, config.playback),

        #[cfg(feature = "gemini")]
        Commands::Analyze { text, style, out } => analyze(&text, &style, &out, &config).await,

        #[cfg(feature = "gemini")]
        Commands::Synthesize {
            archive,
            segment,
            portraits,
        } => synthesize(&archive, segment, portraits, &config).await,

        #[cfg(feature = "gemini")]
        Commands::Narrate {
            archive,
            segment,
            voice,
        } => narrate(&archive, segment, voice, &config).await,
    };

    #[cfg(feature = "observability")]
    storyboard::shutdown_observability();

    result
}
