//! Project archives.
//!
//! A project is a zip file holding `project.json` (the story plus an asset
//! manifest) and every binary asset under `assets/` by relative path:
//!
//! ```text
//! project.json
//! assets/segments/<segment>/grid.png
//! assets/segments/<segment>/cell-<index>.png
//! assets/segments/<segment>/narration.wav
//! assets/characters/<id>.png
//! assets/settings/<id>.png
//! ```
//!
//! Import is tolerant: assets that fail to rehydrate are skipped and
//! reported as warnings, and the rest of the project loads.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod export;
mod import;
mod manifest;

pub use export::{export, export_to_path};
pub use import::{ImportReport, import, import_from_path};
pub use manifest::{AudioEntry, MANIFEST_NAME, Manifest, SegmentAssets, SelectionEntry};
