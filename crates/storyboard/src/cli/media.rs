//! Single-file media commands: cell extraction and audio packaging.

use super::CliResult;
use std::fs;
use std::path::Path;
use storyboard::{CellIndex, extract_cell_png, package};
use tracing::{info, instrument};

/// Crop one cell of a composite grid to a PNG.
#[instrument(skip_all, fields(grid = %grid.display(), index = index))]
pub fn extract(grid: &Path, index: u8, out: &Path) -> CliResult {
    let bytes = fs::read(grid)?;
    let index = CellIndex::new(usize::from(index))?;

    let cell = extract_cell_png(&bytes, index)?;
    fs::write(out, cell.bytes())?;

    info!(bytes = cell.len(), out = %out.display(), "Cell written");
    println!("Wrote cell {} ({} bytes) to {}", index, cell.len(), out.display());
    Ok(())
}

/// Wrap raw PCM in a WAV container and report its duration.
#[instrument(skip_all, fields(pcm = %pcm.display(), sample_rate = sample_rate))]
pub fn package_audio(pcm: &Path, out: &Path, sample_rate: u32) -> CliResult {
    let raw = fs::read(pcm)?;

    let packaged = package(&raw, sample_rate)?;
    fs::write(out, packaged.container())?;

    info!(bytes = packaged.container().len(), "Audio packaged");
    println!(
        "Wrote {} ({} bytes, {:.3} s)",
        out.display(),
        packaged.container().len(),
        packaged.duration_seconds()
    );
    Ok(())
}
