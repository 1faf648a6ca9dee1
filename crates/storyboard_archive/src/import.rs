//! Reading project archives.

use crate::manifest::{FORMAT_VERSION, MANIFEST_NAME, Manifest};
use derive_getters::Getters;
use std::io::{Read, Seek};
use std::path::Path;
use storyboard_core::{AudioAsset, ImageData, Story};
use storyboard_error::{ArchiveError, ArchiveErrorKind, StoryboardResult};
use tracing::{info, instrument, warn};
use zip::ZipArchive;

/// A loaded project and whatever could not be restored.
#[derive(Debug, Clone, Getters)]
pub struct ImportReport {
    /// The story, with every asset that could be rehydrated
    story: Story,
    /// One message per skipped asset, naming its path
    warnings: Vec<String>,
}

impl ImportReport {
    /// Whether every asset was restored.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Take the story.
    pub fn into_story(self) -> Story {
        self.story
    }
}

/// Load a project archive.
///
/// Fails only when the archive or its manifest is unreadable. Missing or
/// unreadable assets are skipped with a warning; a selected cell whose image
/// is missing is dropped from the selection.
#[instrument(skip(reader))]
pub fn import<R: Read + Seek>(reader: R) -> StoryboardResult<ImportReport> {
    let mut zip = ZipArchive::new(reader)
        .map_err(|e| ArchiveError::new(ArchiveErrorKind::Read(e.to_string())))?;

    let bytes = read_entry(&mut zip, MANIFEST_NAME)
        .map_err(|e| ArchiveError::new(ArchiveErrorKind::MissingManifest(e)))?;
    let manifest: Manifest = serde_json::from_slice(&bytes)
        .map_err(|e| ArchiveError::new(ArchiveErrorKind::InvalidManifest(e.to_string())))?;

    let mut warnings = Vec::new();
    if manifest.version > FORMAT_VERSION {
        warn!(version = manifest.version, "Archive was written by a newer version");
        warnings.push(format!(
            "archive format {} is newer than supported format {}",
            manifest.version, FORMAT_VERSION
        ));
    }

    let mut story = manifest.story;
    for segment in story.segments_mut() {
        let assets = manifest
            .segments
            .get(segment.id())
            .cloned()
            .unwrap_or_default();

        let grid = assets
            .grid
            .and_then(|path| load_image(&mut zip, &path, &mut warnings));
        let selection = assets
            .selection
            .into_iter()
            .filter_map(|entry| {
                load_image(&mut zip, &entry.path, &mut warnings).map(|image| (entry.index, image))
            })
            .collect();
        let audio = assets.audio.and_then(|entry| {
            load_bytes(&mut zip, &entry.path, &mut warnings)
                .map(|bytes| AudioAsset::new(bytes, entry.duration_seconds))
        });

        segment.restore(grid, selection, audio);
    }

    for (id, path) in &manifest.characters {
        let portrait = load_image(&mut zip, path, &mut warnings);
        match story.character_mut(id) {
            Some(character) => character.set_portrait(portrait),
            None => warnings.push(format!("portrait for unknown character {}", id)),
        }
    }
    for (id, path) in &manifest.settings {
        let portrait = load_image(&mut zip, path, &mut warnings);
        match story.setting_mut(id) {
            Some(setting) => setting.set_portrait(portrait),
            None => warnings.push(format!("portrait for unknown setting {}", id)),
        }
    }

    info!(
        title = %story.title(),
        segments = story.segments().len(),
        warnings = warnings.len(),
        "Imported project"
    );
    Ok(ImportReport { story, warnings })
}

/// Load a project archive from a file.
pub fn import_from_path(path: impl AsRef<Path>) -> StoryboardResult<ImportReport> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        ArchiveError::new(ArchiveErrorKind::Read(format!("{}: {}", path.display(), e)))
    })?;
    import(file)
}

fn read_entry<R: Read + Seek>(zip: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>, String> {
    let mut file = zip.by_name(name).map_err(|e| format!("{}: {}", name, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("{}: {}", name, e))?;
    Ok(bytes)
}

fn load_bytes<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    path: &str,
    warnings: &mut Vec<String>,
) -> Option<Vec<u8>> {
    match read_entry(zip, path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(path, error = %e, "Skipping asset");
            warnings.push(format!("missing asset {}", e));
            None
        }
    }
}

fn load_image<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    path: &str,
    warnings: &mut Vec<String>,
) -> Option<ImageData> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    load_bytes(zip, path, warnings)
        .map(|bytes| ImageData::new(ImageData::mime_for_extension(extension), bytes))
}
