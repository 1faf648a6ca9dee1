// Cell geometry and extraction against real encoded composites.

mod test_utils;

use image::GenericImageView;
use storyboard_core::{CellIndex, ImageData};
use storyboard_error::{DecodeErrorKind, StoryboardErrorKind};
use storyboard_grid::{CellGeometry, extract_all, extract_cell_png};
use test_utils::{CELL_PX, cell, cell_color, pixel_color, test_grid, test_grid_with_remainder};

#[test]
fn test_cells_tile_without_overlap() {
    let geometry = CellGeometry::for_dimensions(301, 302).unwrap();
    let (w, h) = geometry.cell_size();
    assert_eq!((w, h), (100, 100));

    for a in CellIndex::all() {
        let (ax, ay) = geometry.offset(a);
        assert!(ax + w <= 301 && ay + h <= 302);
        for b in CellIndex::all().filter(|b| *b != a) {
            let (bx, by) = geometry.offset(b);
            let disjoint = ax + w <= bx || bx + w <= ax || ay + h <= by || by + h <= ay;
            assert!(disjoint, "cells {} and {} overlap", a, b);
        }
    }
}

#[test]
fn test_each_cell_has_its_own_color() {
    let grid = test_grid();
    for index in CellIndex::all() {
        let extracted = extract_cell_png(grid.bytes(), index).unwrap();
        assert_eq!(pixel_color(&extracted), cell_color(index.get()));
    }
}

#[test]
fn test_remainder_belongs_to_no_cell() {
    let grid = test_grid_with_remainder(2);
    let cells = extract_all(grid.bytes()).unwrap();
    assert_eq!(cells.len(), 9);

    for (index, extracted) in cells.iter().enumerate() {
        let decoded = image::load_from_memory(extracted.bytes()).unwrap();
        assert_eq!(decoded.dimensions(), (CELL_PX, CELL_PX));
        // The bottom-right pixel still carries the cell color, not the black border
        let rgb = decoded.to_rgb8();
        assert_eq!(*rgb.get_pixel(CELL_PX - 1, CELL_PX - 1), cell_color(index));
    }
}

#[test]
fn test_extraction_is_deterministic() {
    let grid = test_grid();
    let first = extract_cell_png(grid.bytes(), cell(7)).unwrap();
    let second = extract_cell_png(grid.bytes(), cell(7)).unwrap();
    assert_eq!(first.bytes(), second.bytes());
    assert_eq!(first.mime(), "image/png");
}

#[test]
fn test_tiny_grid_is_rejected() {
    let tiny = image::RgbImage::new(2, 9);
    let mut buffer = std::io::Cursor::new(Vec::new());
    tiny.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    let grid = ImageData::png(buffer.into_inner());

    let err = extract_cell_png(grid.bytes(), cell(0)).unwrap_err();
    match err.kind() {
        StoryboardErrorKind::Decode(e) => assert_eq!(
            e.kind,
            DecodeErrorKind::GridTooSmall {
                width: 2,
                height: 9
            }
        ),
        other => panic!("unexpected error: {}", other),
    }
}
