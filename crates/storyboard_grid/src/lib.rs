//! Grid synthesis, cell extraction, and ordered selection.
//!
//! - [`extract_cell`] and friends split a composite into its nine cells
//! - [`GridSynthesizer`] requests composites with primary/fallback models
//! - [`SelectionIntent`] holds the ordered, token-fenced selection state
//! - [`Workbench`] ties them together over a [`Story`](storyboard_core::Story)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extractor;
mod prompt;
mod selection;
mod synthesizer;
mod workbench;

pub use extractor::{
    CellGeometry, decode_grid, encode_png, extract_all, extract_cell, extract_cell_png,
};
pub use prompt::{PortraitKind, build_grid_prompt, build_portrait_prompt, build_scene_prompt};
pub use selection::{SelectionIntent, SelectionTicket, toggled};
pub use synthesizer::{GridSynthesizer, SceneRequest, SceneRequestBuilder};
pub use workbench::{ExtractedSelection, ToggleOutcome, ToggleTicket, Workbench};
