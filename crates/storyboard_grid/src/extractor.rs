//! Deterministic decomposition of a composite into nine cells.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use storyboard_core::{CellIndex, GRID_SIDE, ImageData};
use storyboard_error::{DecodeError, DecodeErrorKind, StoryboardResult};
use tracing::{debug, instrument};

/// Cell size for a composite of given dimensions.
///
/// Cells are `floor(W/3) x floor(H/3)`; the remainder on the right and bottom
/// edges belongs to no cell.
///
/// # Examples
///
/// ```
/// use storyboard_core::CellIndex;
/// use storyboard_grid::CellGeometry;
///
/// let geometry = CellGeometry::for_dimensions(100, 200).unwrap();
/// assert_eq!(geometry.cell_size(), (33, 66));
/// assert_eq!(geometry.offset(CellIndex::new(5).unwrap()), (66, 66));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    cell_width: u32,
    cell_height: u32,
}

impl CellGeometry {
    /// Geometry for a `width x height` composite.
    #[track_caller]
    pub fn for_dimensions(width: u32, height: u32) -> Result<Self, DecodeError> {
        let cell_width = width / GRID_SIDE;
        let cell_height = height / GRID_SIDE;
        if cell_width == 0 || cell_height == 0 {
            return Err(DecodeError::new(DecodeErrorKind::GridTooSmall {
                width,
                height,
            }));
        }
        Ok(Self {
            cell_width,
            cell_height,
        })
    }

    /// `(width, height)` of every cell.
    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_width, self.cell_height)
    }

    /// Top-left source offset of a cell.
    pub fn offset(&self, index: CellIndex) -> (u32, u32) {
        (
            index.column() * self.cell_width,
            index.row() * self.cell_height,
        )
    }
}

/// Decode an encoded composite.
pub fn decode_grid(bytes: &[u8]) -> StoryboardResult<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| DecodeError::new(DecodeErrorKind::Image(e.to_string())).into())
}

/// Copy one cell out of a decoded composite. No scaling or interpolation.
pub fn extract_cell(grid: &DynamicImage, index: CellIndex) -> StoryboardResult<DynamicImage> {
    let (width, height) = grid.dimensions();
    let geometry = CellGeometry::for_dimensions(width, height)?;
    let (x, y) = geometry.offset(index);
    let (cell_width, cell_height) = geometry.cell_size();
    Ok(grid.crop_imm(x, y, cell_width, cell_height))
}

/// Encode a raster as PNG.
pub fn encode_png(image: &DynamicImage) -> StoryboardResult<ImageData> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| DecodeError::new(DecodeErrorKind::Encode(e.to_string())))?;
    Ok(ImageData::png(buffer.into_inner()))
}

/// Decode a composite, copy one cell, and encode it as PNG.
///
/// Identical input yields byte-identical output.
#[instrument(skip(grid), fields(grid_len = grid.len(), index = %index))]
pub fn extract_cell_png(grid: &[u8], index: CellIndex) -> StoryboardResult<ImageData> {
    let decoded = decode_grid(grid)?;
    let cell = extract_cell(&decoded, index)?;
    let encoded = encode_png(&cell)?;
    debug!(cell_len = encoded.len(), "Extracted cell");
    Ok(encoded)
}

/// Decode once and extract all nine cells in row-major order.
#[instrument(skip(grid), fields(grid_len = grid.len()))]
pub fn extract_all(grid: &[u8]) -> StoryboardResult<Vec<ImageData>> {
    let decoded = decode_grid(grid)?;
    CellIndex::all()
        .map(|index| extract_cell(&decoded, index).and_then(|cell| encode_png(&cell)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_images_are_rejected() {
        assert!(CellGeometry::for_dimensions(2, 300).is_err());
        assert!(CellGeometry::for_dimensions(300, 2).is_err());
        assert!(CellGeometry::for_dimensions(3, 3).is_ok());
    }

    #[test]
    fn remainder_is_dropped() {
        let geometry = CellGeometry::for_dimensions(11, 8).unwrap();
        assert_eq!(geometry.cell_size(), (3, 2));
        assert_eq!(geometry.offset(CellIndex::new(8).unwrap()), (6, 4));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = extract_cell_png(b"not an image", CellIndex::new(0).unwrap()).unwrap_err();
        assert!(format!("{}", err).contains("Failed to decode image"));
    }
}
