//! Commands that call the Gemini services.

use super::CliResult;
use std::fs;
use std::path::Path;
use storyboard::{
    ApiAccess, GeminiClient, GridSynthesizer, NarrationService, SelectionError,
    SelectionErrorKind, Story, StoryAnalyzer, StoryboardConfig, StoryboardResult, Voice,
    Workbench, export_to_path, import_from_path,
};
use tracing::{info, instrument, warn};

fn client(config: &StoryboardConfig) -> StoryboardResult<GeminiClient> {
    Ok(GeminiClient::new()?.with_config(&config.generation, &config.audio))
}

fn load(archive: &Path) -> StoryboardResult<Story> {
    let report = import_from_path(archive)?;
    for warning in report.warnings() {
        warn!(warning = %warning, "Import warning");
    }
    Ok(report.into_story())
}

fn segment_at(story: &Story, position: usize) -> StoryboardResult<storyboard::SegmentId> {
    story
        .segments()
        .get(position)
        .map(|segment| segment.id().clone())
        .ok_or_else(|| {
            SelectionError::new(SelectionErrorKind::UnknownSegment(format!(
                "#{} of {}",
                position,
                story.segments().len()
            )))
            .into()
        })
}

/// Analyze a story file and write a fresh project archive.
#[instrument(skip_all, fields(text = %text.display(), style = style))]
pub async fn analyze(text: &Path, style: &str, out: &Path, config: &StoryboardConfig) -> CliResult {
    let prose = fs::read_to_string(text)?;
    let breakdown = client(config)?.analyze(&prose, style).await?;
    let story = breakdown.into_story(style);

    export_to_path(&story, out)?;
    info!(segments = story.segments().len(), "Project written");
    println!(
        "Wrote \"{}\" with {} segments, {} characters, {} settings to {}",
        story.title(),
        story.segments().len(),
        story.characters().len(),
        story.settings().len(),
        out.display()
    );
    Ok(())
}

/// Generate a grid for one segment and rewrite the archive.
#[instrument(skip_all, fields(archive = %archive.display(), segment = segment))]
pub async fn synthesize(
    archive: &Path,
    segment: usize,
    portraits: bool,
    config: &StoryboardConfig,
) -> CliResult {
    let story = load(archive)?;
    let segment_id = segment_at(&story, segment)?;
    let synthesizer = GridSynthesizer::new(client(config)?, &config.generation, ApiAccess::granted());
    let workbench = Workbench::new(story, synthesizer);

    if portraits {
        let snapshot = workbench.story();
        let Some(target) = snapshot.segment(&segment_id) else {
            return Err(SelectionError::new(SelectionErrorKind::UnknownSegment(
                segment_id.to_string(),
            ))
            .into());
        };
        for id in target.character_ids() {
            if snapshot.character(id).is_some_and(|c| c.portrait().is_none()) {
                workbench.generate_character_portrait(id).await?;
                println!("Generated portrait for character {}", id);
            }
        }
        if snapshot
            .setting(target.setting_id())
            .is_some_and(|s| s.portrait().is_none())
        {
            workbench.generate_setting_portrait(target.setting_id()).await?;
            println!("Generated portrait for setting {}", target.setting_id());
        }
    }

    workbench.regenerate_grid(&segment_id).await?;
    export_to_path(&workbench.story(), archive)?;

    println!(
        "Generated grid for segment {} ({}); center cell selected",
        segment, segment_id
    );
    Ok(())
}

/// Narrate one segment and rewrite the archive.
#[instrument(skip_all, fields(archive = %archive.display(), segment = segment))]
pub async fn narrate(
    archive: &Path,
    segment: usize,
    voice: Option<Voice>,
    config: &StoryboardConfig,
) -> CliResult {
    let mut story = load(archive)?;
    let segment_id = segment_at(&story, segment)?;
    let service = NarrationService::new(client(config)?, &config.audio, ApiAccess::granted());

    let text = story
        .segment(&segment_id)
        .map(|s| s.text().clone())
        .unwrap_or_default();
    let audio = service.narrate(&text, voice).await?;
    let duration = audio.duration_seconds();

    if let Some(target) = story.segment_mut(&segment_id) {
        target.attach_audio(audio);
    }
    export_to_path(&story, archive)?;

    println!(
        "Narrated segment {} ({}): {:.2} s",
        segment, segment_id, duration
    );
    Ok(())
}
