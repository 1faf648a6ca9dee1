//! Archive commands: inspection and simulated playback.

use super::CliResult;
use std::path::Path;
use storyboard::{
    PlaybackConfig, PlaybackEffect, Story, TimedEffect, import_from_path, playback_segments,
    simulate,
};
use tracing::{info, instrument, warn};

/// Print a summary of an archive and any import warnings.
#[instrument(skip_all, fields(archive = %archive.display()))]
pub fn inspect(archive: &Path) -> CliResult {
    let report = import_from_path(archive)?;
    print!("{}", summarize(report.story()));

    if report.is_complete() {
        println!("All assets loaded.");
    } else {
        println!("Warnings:");
        for warning in report.warnings() {
            warn!(warning = %warning, "Import warning");
            println!("  - {}", warning);
        }
    }
    Ok(())
}

/// Simulate playback of an archive and print the transition log.
#[instrument(skip_all, fields(archive = %archive.display(), limit_ms = limit_ms))]
pub fn play(archive: &Path, limit_ms: u64, config: PlaybackConfig) -> CliResult {
    let report = import_from_path(archive)?;
    for warning in report.warnings() {
        warn!(warning = %warning, "Import warning");
    }

    let log = simulate(playback_segments(report.story()), config, limit_ms)?;
    info!(effects = log.len(), "Simulation complete");
    for entry in &log {
        if let Some(line) = describe(entry) {
            println!("{}", line);
        }
    }
    Ok(())
}

pub(crate) fn summarize(story: &Story) -> String {
    let mut out = format!(
        "{} [{}]\nStyle: {}\n",
        story.title(),
        story.style_label(),
        story.cinematic_style()
    );

    out.push_str(&format!("Segments ({}):\n", story.segments().len()));
    for (position, segment) in story.segments().iter().enumerate() {
        let narration = segment
            .audio_duration()
            .map(|d| format!("{:.1} s narration", d))
            .unwrap_or_else(|| "no narration".to_string());
        out.push_str(&format!(
            "  {:>2}. {} | grid: {} | selected: {:?} | {}\n      {}\n",
            position,
            segment.id(),
            if segment.has_grid() { "yes" } else { "no" },
            segment
                .selected_indices()
                .iter()
                .map(|i| i.get())
                .collect::<Vec<_>>(),
            narration,
            excerpt(segment.text(), 72),
        ));
    }

    for character in story.characters() {
        out.push_str(&format!(
            "Character {} ({}): portrait {}\n",
            character.id(),
            character.name(),
            if character.portrait().is_some() { "yes" } else { "no" }
        ));
    }
    for setting in story.settings() {
        out.push_str(&format!(
            "Setting {} ({}): portrait {}\n",
            setting.id(),
            setting.name(),
            if setting.portrait().is_some() { "yes" } else { "no" }
        ));
    }
    out
}

pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

/// One log line per user-visible transition; control visibility is noise.
pub(crate) fn describe(entry: &TimedEffect) -> Option<String> {
    let what = match &entry.effect {
        PlaybackEffect::StateChanged(state) => format!("state -> {}", state),
        PlaybackEffect::SegmentChanged { index } => format!("segment {}", index),
        PlaybackEffect::ShowImage { segment, image } => {
            format!("show image {} of segment {}", image, segment)
        }
        PlaybackEffect::LoadAudio { ticket, audio } => {
            format!("load audio {} ({:.1} s)", ticket, audio.duration_seconds())
        }
        PlaybackEffect::PlayAudio { ticket } => format!("play audio {}", ticket),
        PlaybackEffect::PauseAudio => "pause audio".to_string(),
        PlaybackEffect::StopAudio => "stop audio".to_string(),
        PlaybackEffect::ShowMediaError(true) => "media error".to_string(),
        PlaybackEffect::Closed => "closed".to_string(),
        PlaybackEffect::SetControlsVisible(_)
        | PlaybackEffect::ShowMediaError(false)
        | PlaybackEffect::RequestFullscreen(_) => return None,
    };
    Some(format!("{:>9} ms  {}", entry.at_ms, what))
}
