//! Story-level orchestration of grids, selections, portraits, and narration.

use crate::extractor::{decode_grid, encode_png, extract_cell, extract_cell_png};
use crate::prompt::{PortraitKind, build_scene_prompt};
use crate::selection::{SelectionIntent, SelectionTicket};
use crate::synthesizer::{GridSynthesizer, SceneRequest};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use storyboard_core::{
    AssetId, AudioAsset, CENTER_CELL, CellIndex, ImageData, Segment, SegmentId, Story,
};
use storyboard_error::{
    BuilderError, DecodeError, DecodeErrorKind, SelectionError, SelectionErrorKind,
    StoryboardResult,
};
use storyboard_interface::ImageGenerator;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
struct WorkbenchState {
    story: Story,
    intents: HashMap<SegmentId, SelectionIntent>,
}

impl WorkbenchState {
    fn segment(&self, id: &SegmentId) -> StoryboardResult<&Segment> {
        self.story.segment(id).ok_or_else(|| {
            SelectionError::new(SelectionErrorKind::UnknownSegment(id.to_string())).into()
        })
    }

    fn segment_mut(&mut self, id: &SegmentId) -> StoryboardResult<&mut Segment> {
        self.story.segment_mut(id).ok_or_else(|| {
            SelectionError::new(SelectionErrorKind::UnknownSegment(id.to_string())).into()
        })
    }

    fn intent(&mut self, id: &SegmentId) -> StoryboardResult<&mut SelectionIntent> {
        let segment = self.story.segment(id).ok_or_else(|| {
            SelectionError::new(SelectionErrorKind::UnknownSegment(id.to_string()))
        })?;
        Ok(self.intents.entry(id.clone()).or_insert_with(|| {
            SelectionIntent::from_published(segment.selected_indices(), segment.generated_images())
        }))
    }
}

fn lock(state: &Mutex<WorkbenchState>) -> MutexGuard<'_, WorkbenchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Result of a completed toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The selection was published
    Applied(Vec<CellIndex>),
    /// A newer toggle or grid replaced this one's intent; nothing was written
    Superseded {
        /// Token of the discarded toggle
        token: u64,
    },
}

/// A toggle whose intent is recorded but whose cells are not yet extracted.
#[derive(Debug, Clone)]
pub struct ToggleTicket {
    segment_id: SegmentId,
    ticket: SelectionTicket,
    grid: Arc<[u8]>,
    cached: Vec<Option<ImageData>>,
}

impl ToggleTicket {
    /// Token fencing this toggle.
    pub fn token(&self) -> u64 {
        self.ticket.token
    }

    /// The selection this toggle intends to publish.
    pub fn indices(&self) -> &[CellIndex] {
        &self.ticket.indices
    }

    /// Extract every intended cell not already cached.
    ///
    /// Decoding and cropping run on the blocking pool. Nothing is written.
    #[instrument(skip(self), fields(segment = %self.segment_id, token = self.ticket.token))]
    pub async fn extract(self) -> StoryboardResult<ExtractedSelection> {
        let missing: Vec<CellIndex> = self
            .ticket
            .indices
            .iter()
            .zip(&self.cached)
            .filter(|(_, cached)| cached.is_none())
            .map(|(index, _)| *index)
            .collect();

        let mut fresh: HashMap<CellIndex, ImageData> = HashMap::new();
        if !missing.is_empty() {
            debug!(missing = missing.len(), "Extracting cells");
            let grid = Arc::clone(&self.grid);
            let extracted = tokio::task::spawn_blocking(move || {
                let decoded = decode_grid(&grid)?;
                missing
                    .into_iter()
                    .map(|index| {
                        extract_cell(&decoded, index)
                            .and_then(|cell| encode_png(&cell))
                            .map(|image| (index, image))
                    })
                    .collect::<StoryboardResult<Vec<_>>>()
            })
            .await
            .map_err(|e| {
                DecodeError::new(DecodeErrorKind::Image(format!(
                    "extraction task failed: {}",
                    e
                )))
            })??;
            fresh.extend(extracted);
        }

        let selection = self
            .ticket
            .indices
            .iter()
            .zip(self.cached)
            .map(|(index, cached)| {
                let image = match cached {
                    Some(image) => image,
                    None => fresh.get(index).cloned().ok_or_else(|| {
                        DecodeError::new(DecodeErrorKind::CellIndex(index.get()))
                    })?,
                };
                Ok((*index, image))
            })
            .collect::<StoryboardResult<Vec<_>>>()?;

        Ok(ExtractedSelection {
            segment_id: self.segment_id,
            token: self.ticket.token,
            grid_epoch: self.ticket.grid_epoch,
            selection,
        })
    }
}

/// Extracted cells for a toggle, ready to commit.
#[derive(Debug, Clone)]
pub struct ExtractedSelection {
    segment_id: SegmentId,
    token: u64,
    grid_epoch: u64,
    selection: Vec<(CellIndex, ImageData)>,
}

impl ExtractedSelection {
    /// Token of the toggle that produced this extraction.
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Owns a story's segments and applies grid, selection, portrait, and
/// narration changes to them.
///
/// State lives behind a mutex that is never held across an await; clones
/// share the same state.
pub struct Workbench<G> {
    state: Arc<Mutex<WorkbenchState>>,
    synthesizer: Arc<GridSynthesizer<G>>,
}

impl<G> Clone for Workbench<G> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            synthesizer: Arc::clone(&self.synthesizer),
        }
    }
}

impl<G> std::fmt::Debug for Workbench<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("Workbench")
            .field("title", state.story.title())
            .field("segments", &state.story.segments().len())
            .finish_non_exhaustive()
    }
}

/// Clears a segment's busy flag when synthesis ends, however it ends.
struct GeneratingGuard {
    state: Arc<Mutex<WorkbenchState>>,
    segment_id: SegmentId,
}

impl Drop for GeneratingGuard {
    fn drop(&mut self) {
        if let Some(segment) = lock(&self.state).story.segment_mut(&self.segment_id) {
            segment.set_generating(false);
        }
    }
}

impl<G: ImageGenerator> Workbench<G> {
    /// Wrap a story.
    pub fn new(story: Story, synthesizer: GridSynthesizer<G>) -> Self {
        Self {
            state: Arc::new(Mutex::new(WorkbenchState {
                story,
                intents: HashMap::new(),
            })),
            synthesizer: Arc::new(synthesizer),
        }
    }

    /// The synthesizer.
    pub fn synthesizer(&self) -> &GridSynthesizer<G> {
        &self.synthesizer
    }

    /// Snapshot of the whole story.
    pub fn story(&self) -> Story {
        lock(&self.state).story.clone()
    }

    /// Snapshot of one segment.
    pub fn segment(&self, id: &SegmentId) -> Option<Segment> {
        lock(&self.state).story.segment(id).cloned()
    }

    /// Toggle a cell and publish the recomputed selection.
    ///
    /// Returns [`ToggleOutcome::Superseded`] when a newer toggle (or a new
    /// grid) was issued for the segment while this one was extracting.
    #[instrument(skip(self), fields(segment = %segment_id, index = %index))]
    pub async fn toggle(
        &self,
        segment_id: &SegmentId,
        index: CellIndex,
    ) -> StoryboardResult<ToggleOutcome> {
        let ticket = self.begin_toggle(segment_id, index)?;
        let token = ticket.token();
        match ticket.extract().await {
            Ok(extracted) => Ok(self.commit(extracted)),
            Err(e) => {
                self.abandon(segment_id, token);
                Err(e)
            }
        }
    }

    /// Record a toggle's intent and snapshot what extraction needs.
    pub fn begin_toggle(
        &self,
        segment_id: &SegmentId,
        index: CellIndex,
    ) -> StoryboardResult<ToggleTicket> {
        let mut state = lock(&self.state);
        let grid = state
            .segment(segment_id)?
            .grid_image()
            .as_ref()
            .map(ImageData::shared_bytes)
            .ok_or_else(|| {
                SelectionError::new(SelectionErrorKind::NoGrid(segment_id.to_string()))
            })?;

        let intent = state.intent(segment_id)?;
        let ticket = intent.toggle(index);
        let cached = ticket
            .indices
            .iter()
            .map(|i| intent.cached(*i).cloned())
            .collect();

        debug!(token = ticket.token, intended = ?ticket.indices, "Toggle issued");
        Ok(ToggleTicket {
            segment_id: segment_id.clone(),
            ticket,
            grid,
            cached,
        })
    }

    /// Publish an extraction if its toggle is still the newest intent.
    pub fn commit(&self, extracted: ExtractedSelection) -> ToggleOutcome {
        let mut guard = lock(&self.state);
        let state = &mut *guard;
        let Some(intent) = state.intents.get_mut(&extracted.segment_id) else {
            return ToggleOutcome::Superseded {
                token: extracted.token,
            };
        };
        intent.remember(extracted.grid_epoch, extracted.selection.iter().cloned());

        if !intent.is_current(extracted.token) {
            debug!(
                segment = %extracted.segment_id,
                token = extracted.token,
                newest = intent.token(),
                "Discarding superseded selection"
            );
            return ToggleOutcome::Superseded {
                token: extracted.token,
            };
        }

        let indices: Vec<CellIndex> = extracted.selection.iter().map(|(i, _)| *i).collect();
        match state.story.segment_mut(&extracted.segment_id) {
            Some(segment) => {
                segment.publish_selection(extracted.selection);
                ToggleOutcome::Applied(indices)
            }
            None => ToggleOutcome::Superseded {
                token: extracted.token,
            },
        }
    }

    fn abandon(&self, segment_id: &SegmentId, token: u64) {
        let mut guard = lock(&self.state);
        let state = &mut *guard;
        let published = state
            .story
            .segment(segment_id)
            .map(|s| s.selected_indices().clone())
            .unwrap_or_default();
        if let Some(intent) = state.intents.get_mut(segment_id) {
            intent.roll_back(token, &published);
        }
    }

    /// Synthesize a new composite for a segment and reset its selection to
    /// the center cell.
    ///
    /// Rejected with [`SelectionErrorKind::Busy`] while another synthesis for
    /// the same segment is in flight. On failure the segment keeps its prior
    /// grid and selection.
    #[instrument(skip(self), fields(segment = %segment_id))]
    pub async fn regenerate_grid(&self, segment_id: &SegmentId) -> StoryboardResult<()> {
        let (scene, _guard) = {
            let mut state = lock(&self.state);
            let segment = state.segment(segment_id)?;
            if *segment.is_generating() {
                return Err(
                    SelectionError::new(SelectionErrorKind::Busy(segment_id.to_string())).into(),
                );
            }
            let scene = SceneRequest::builder()
                .prompt(build_scene_prompt(&state.story, segment))
                .reference_images(state.story.reference_images(segment))
                .style(state.story.cinematic_style().clone())
                .variations(segment.grid_variations().clone())
                .build()
                .map_err(|e| BuilderError::from(e.to_string()))?;
            state.segment_mut(segment_id)?.set_generating(true);
            let guard = GeneratingGuard {
                state: Arc::clone(&self.state),
                segment_id: segment_id.clone(),
            };
            (scene, guard)
        };

        let grid = self.synthesizer.synthesize(&scene).await?;
        self.apply_grid(segment_id, grid, false).await?;
        info!("Grid regenerated");
        Ok(())
    }

    /// Install a composite produced elsewhere (imported, loaded from disk).
    ///
    /// Replaces the grid, resets the selection to the center cell, and
    /// invalidates in-flight toggles. Rejected with
    /// [`SelectionErrorKind::Busy`] while a synthesis for the segment is in
    /// flight.
    #[instrument(skip(self, grid), fields(segment = %segment_id))]
    pub async fn install_grid(&self, segment_id: &SegmentId, grid: ImageData) -> StoryboardResult<()> {
        self.apply_grid(segment_id, grid, true).await
    }

    async fn apply_grid(
        &self,
        segment_id: &SegmentId,
        grid: ImageData,
        reject_busy: bool,
    ) -> StoryboardResult<()> {
        let ensure_idle = |state: &WorkbenchState| -> StoryboardResult<()> {
            let segment = state.segment(segment_id)?;
            if reject_busy && *segment.is_generating() {
                return Err(
                    SelectionError::new(SelectionErrorKind::Busy(segment_id.to_string())).into(),
                );
            }
            Ok(())
        };
        ensure_idle(&lock(&self.state))?;

        let bytes = grid.shared_bytes();
        let center = tokio::task::spawn_blocking(move || extract_cell_png(&bytes, CENTER_CELL))
            .await
            .map_err(|e| {
                DecodeError::new(DecodeErrorKind::Image(format!(
                    "extraction task failed: {}",
                    e
                )))
            })??;

        // A synthesis may have started while the center cell was extracting.
        let mut state = lock(&self.state);
        ensure_idle(&state)?;
        state.intent(segment_id)?.reset_for_new_grid(center.clone());
        state.segment_mut(segment_id)?.replace_grid(grid, center);
        Ok(())
    }

    /// Generate a portrait for a character.
    #[instrument(skip(self), fields(character = %id))]
    pub async fn generate_character_portrait(&self, id: &AssetId) -> StoryboardResult<()> {
        let (prompt, style) = {
            let state = lock(&self.state);
            let character = state.story.character(id).ok_or_else(|| {
                SelectionError::new(SelectionErrorKind::UnknownAsset(id.to_string()))
            })?;
            (
                character.visual_prompt().clone(),
                state.story.cinematic_style().clone(),
            )
        };
        let portrait = self
            .synthesizer
            .synthesize_portrait(PortraitKind::Character, &prompt, &style)
            .await?;
        match lock(&self.state).story.character_mut(id) {
            Some(character) => character.set_portrait(Some(portrait)),
            None => warn!("Character removed while its portrait was generating"),
        }
        Ok(())
    }

    /// Generate an establishing shot for a setting.
    #[instrument(skip(self), fields(setting = %id))]
    pub async fn generate_setting_portrait(&self, id: &AssetId) -> StoryboardResult<()> {
        let (prompt, style) = {
            let state = lock(&self.state);
            let setting = state.story.setting(id).ok_or_else(|| {
                SelectionError::new(SelectionErrorKind::UnknownAsset(id.to_string()))
            })?;
            (
                setting.visual_prompt().clone(),
                state.story.cinematic_style().clone(),
            )
        };
        let portrait = self
            .synthesizer
            .synthesize_portrait(PortraitKind::Setting, &prompt, &style)
            .await?;
        match lock(&self.state).story.setting_mut(id) {
            Some(setting) => setting.set_portrait(Some(portrait)),
            None => warn!("Setting removed while its portrait was generating"),
        }
        Ok(())
    }

    /// Attach (or replace) a segment's narration.
    pub fn attach_narration(&self, segment_id: &SegmentId, audio: AudioAsset) -> StoryboardResult<()> {
        lock(&self.state).segment_mut(segment_id)?.attach_audio(audio);
        Ok(())
    }

    /// Delete a segment's narration, returning it.
    pub fn remove_narration(&self, segment_id: &SegmentId) -> StoryboardResult<Option<AudioAsset>> {
        Ok(lock(&self.state).segment_mut(segment_id)?.remove_audio())
    }
}
