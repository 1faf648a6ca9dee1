//! Writing project archives.

use crate::manifest::{
    AudioEntry, FORMAT_VERSION, MANIFEST_NAME, Manifest, SegmentAssets, SelectionEntry,
};
use std::collections::BTreeMap;
use std::io::{Seek, Write};
use std::path::Path;
use storyboard_core::{ImageData, Story};
use storyboard_error::{ArchiveError, ArchiveErrorKind, JsonError, StoryboardResult};
use tracing::{debug, info, instrument};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Write `story` and all of its binary assets as a zip archive.
#[instrument(skip(story, writer), fields(title = %story.title()))]
pub fn export<W: Write + Seek>(story: &Story, writer: W) -> StoryboardResult<()> {
    let mut zip = ZipWriter::new(writer);
    let mut manifest = Manifest {
        version: FORMAT_VERSION,
        story: story.clone(),
        segments: BTreeMap::new(),
        characters: BTreeMap::new(),
        settings: BTreeMap::new(),
    };

    for segment in story.segments() {
        let base = format!("assets/segments/{}", segment.id());
        let mut assets = SegmentAssets::default();

        if let Some(grid) = segment.grid_image() {
            let path = format!("{}/grid.{}", base, grid.extension());
            write_entry(&mut zip, &path, grid.bytes())?;
            assets.grid = Some(path);
        }
        for (index, image) in segment
            .selected_indices()
            .iter()
            .zip(segment.generated_images())
        {
            let path = format!("{}/cell-{}.{}", base, index, image.extension());
            write_entry(&mut zip, &path, image.bytes())?;
            assets.selection.push(SelectionEntry {
                index: *index,
                path,
            });
        }
        if let Some(audio) = segment.audio() {
            let path = format!("{}/narration.wav", base);
            write_entry(&mut zip, &path, audio.container())?;
            assets.audio = Some(AudioEntry {
                path,
                duration_seconds: audio.duration_seconds(),
            });
        }

        if assets != SegmentAssets::default() {
            manifest.segments.insert(segment.id().clone(), assets);
        }
    }

    for character in story.characters() {
        if let Some(portrait) = character.portrait() {
            let path = portrait_path("characters", character.id().as_str(), portrait);
            write_entry(&mut zip, &path, portrait.bytes())?;
            manifest.characters.insert(character.id().clone(), path);
        }
    }
    for setting in story.settings() {
        if let Some(portrait) = setting.portrait() {
            let path = portrait_path("settings", setting.id().as_str(), portrait);
            write_entry(&mut zip, &path, portrait.bytes())?;
            manifest.settings.insert(setting.id().clone(), path);
        }
    }

    let json = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| JsonError::new(format!("Failed to serialize manifest: {}", e)))?;
    write_entry(&mut zip, MANIFEST_NAME, &json)?;

    zip.finish()
        .map_err(|e| ArchiveError::new(ArchiveErrorKind::Write(e.to_string())))?;
    info!(segments = story.segments().len(), "Exported project");
    Ok(())
}

/// Write an archive to a file, replacing it.
pub fn export_to_path(story: &Story, path: impl AsRef<Path>) -> StoryboardResult<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| {
        ArchiveError::new(ArchiveErrorKind::Write(format!("{}: {}", path.display(), e)))
    })?;
    export(story, file)
}

fn portrait_path(kind: &str, id: &str, image: &ImageData) -> String {
    format!("assets/{}/{}.{}", kind, id, image.extension())
}

fn write_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    bytes: &[u8],
) -> StoryboardResult<()> {
    debug!(path, len = bytes.len(), "Writing archive entry");
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(path, options)
        .and_then(|_| zip.write_all(bytes).map_err(zip::result::ZipError::from))
        .map_err(|e| ArchiveError::new(ArchiveErrorKind::Write(format!("{}: {}", path, e))))?;
    Ok(())
}
