//! Test utilities for grid tests.
//!
//! Provides a mock image generator and helpers that build real composites.

pub mod mock_generator;

#[allow(unused_imports)]
pub use mock_generator::{MockImageGenerator, MockResponse};

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use storyboard_core::{CellIndex, ImageData, Segment, Story};

/// Side of one cell in the test composite.
#[allow(dead_code)]
pub const CELL_PX: u32 = 4;

/// A distinct fill color per cell, row-major.
#[allow(dead_code)]
pub fn cell_color(index: usize) -> Rgb<u8> {
    Rgb([(index as u8) * 25, 255 - (index as u8) * 25, 100])
}

/// A 3x3 composite where each cell is a solid, distinct color.
///
/// `extra` pixels are added on the right and bottom edges to exercise the
/// remainder that belongs to no cell.
#[allow(dead_code)]
pub fn test_grid_with_remainder(extra: u32) -> ImageData {
    let side = CELL_PX * 3 + extra;
    let image = RgbImage::from_fn(side, side, |x, y| {
        if x >= CELL_PX * 3 || y >= CELL_PX * 3 {
            return Rgb([0, 0, 0]);
        }
        let index = (y / CELL_PX) * 3 + x / CELL_PX;
        cell_color(index as usize)
    });
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode test grid");
    ImageData::png(buffer.into_inner())
}

/// A 3x3 composite with no remainder.
#[allow(dead_code)]
pub fn test_grid() -> ImageData {
    test_grid_with_remainder(0)
}

/// Color of the top-left pixel of an encoded cell.
#[allow(dead_code)]
pub fn pixel_color(image: &ImageData) -> Rgb<u8> {
    let decoded = image::load_from_memory(image.bytes())
        .expect("Failed to decode cell")
        .to_rgb8();
    *decoded.get_pixel(0, 0)
}

/// Shorthand for a valid cell index.
#[allow(dead_code)]
pub fn cell(index: usize) -> CellIndex {
    CellIndex::new(index).expect("Cell index out of range")
}

/// A one-segment story with no grid yet.
#[allow(dead_code)]
pub fn test_story() -> Story {
    let segment = Segment::builder()
        .id("seg-1")
        .text("The lighthouse keeper climbs the stairs.")
        .setting_id("lighthouse")
        .key_visual_action("climbing the spiral stairs")
        .grid_variations(vec!["stairs".to_string(); 9])
        .build()
        .expect("Failed to build test segment");
    Story::new(
        "Keeper",
        "moody watercolor",
        "Watercolor",
        Vec::new(),
        vec![storyboard_core::Setting::new(
            "lighthouse",
            "Lighthouse",
            "A lonely tower",
            "a white lighthouse on black rocks",
        )],
        vec![segment],
    )
}
