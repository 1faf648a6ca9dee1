//! Addressing for the nine cells of a composite grid.

use serde::{Deserialize, Serialize};
use storyboard_error::{DecodeError, DecodeErrorKind};

/// Cells per grid row and column.
pub const GRID_SIDE: u32 = 3;

/// Cells per grid.
pub const CELL_COUNT: usize = 9;

/// Default selection after a grid is (re)generated.
pub const CENTER_CELL: CellIndex = CellIndex(4);

/// A cell position in `0..=8`, row-major from the top-left.
///
/// # Examples
///
/// ```
/// use storyboard_core::CellIndex;
///
/// let cell = CellIndex::new(5).unwrap();
/// assert_eq!(cell.row(), 1);
/// assert_eq!(cell.column(), 2);
/// assert!(CellIndex::new(9).is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct CellIndex(u8);

impl CellIndex {
    /// Validate a raw index.
    #[track_caller]
    pub fn new(index: usize) -> Result<Self, DecodeError> {
        if index < CELL_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(DecodeError::new(DecodeErrorKind::CellIndex(index)))
        }
    }

    /// All nine cells in row-major order.
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..CELL_COUNT as u8).map(CellIndex)
    }

    /// Raw index.
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Grid row (index div 3).
    pub fn row(self) -> u32 {
        self.0 as u32 / GRID_SIDE
    }

    /// Grid column (index mod 3).
    pub fn column(self) -> u32 {
        self.0 as u32 % GRID_SIDE
    }

    /// One-based frame number used in prompts.
    pub fn frame_number(self) -> usize {
        self.get() + 1
    }
}

impl TryFrom<u8> for CellIndex {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CellIndex::new(value as usize)
    }
}

impl From<CellIndex> for u8 {
    fn from(value: CellIndex) -> Self {
        value.0
    }
}
