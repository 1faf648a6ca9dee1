//! Ordered selection state fenced by request tokens.

use std::collections::HashMap;
use storyboard_core::{CENTER_CELL, CellIndex, ImageData};

/// Toggle `index` in an ordered selection.
///
/// Present indices are removed (others keep their order); absent indices are
/// appended.
///
/// # Examples
///
/// ```
/// use storyboard_core::CellIndex;
/// use storyboard_grid::toggled;
///
/// let c = |i| CellIndex::new(i).unwrap();
/// assert_eq!(toggled(&[c(4), c(0)], c(7)), vec![c(4), c(0), c(7)]);
/// assert_eq!(toggled(&[c(4), c(0), c(7)], c(0)), vec![c(4), c(7)]);
/// ```
pub fn toggled(current: &[CellIndex], index: CellIndex) -> Vec<CellIndex> {
    if current.contains(&index) {
        current.iter().copied().filter(|&i| i != index).collect()
    } else {
        current.iter().copied().chain(std::iter::once(index)).collect()
    }
}

/// A selection a toggle intends to publish, stamped with its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    /// Monotonic token; only the newest may publish
    pub token: u64,
    /// Grid generation the ticket was issued against
    pub grid_epoch: u64,
    /// The intended selection, in order
    pub indices: Vec<CellIndex>,
}

/// Per-segment selection intent.
///
/// `indices` is the newest *intended* selection, which may be ahead of what
/// the segment has published while extractions are in flight. Every toggle
/// and every grid replacement bumps the token; grid replacements also bump
/// the epoch and drop cached cells.
#[derive(Debug, Default)]
pub struct SelectionIntent {
    indices: Vec<CellIndex>,
    token: u64,
    grid_epoch: u64,
    cache: HashMap<CellIndex, ImageData>,
}

impl SelectionIntent {
    /// Intent matching an already-published selection.
    pub fn from_published(indices: &[CellIndex], images: &[ImageData]) -> Self {
        Self {
            indices: indices.to_vec(),
            token: 0,
            grid_epoch: 0,
            cache: indices.iter().copied().zip(images.iter().cloned()).collect(),
        }
    }

    /// Current intended selection.
    pub fn indices(&self) -> &[CellIndex] {
        &self.indices
    }

    /// Newest token issued.
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Apply a toggle to the intent and issue a ticket for it.
    pub fn toggle(&mut self, index: CellIndex) -> SelectionTicket {
        self.indices = toggled(&self.indices, index);
        self.token += 1;
        SelectionTicket {
            token: self.token,
            grid_epoch: self.grid_epoch,
            indices: self.indices.clone(),
        }
    }

    /// Whether `token` is still the newest.
    pub fn is_current(&self, token: u64) -> bool {
        self.token == token
    }

    /// Forget the intent after a failed extraction, falling back to the
    /// published selection. Only the newest ticket may roll back.
    pub fn roll_back(&mut self, token: u64, published: &[CellIndex]) {
        if self.is_current(token) {
            self.indices = published.to_vec();
        }
    }

    /// A new grid replaced the old one: reset to the center cell and drop
    /// cached cells. Any in-flight ticket becomes stale.
    pub fn reset_for_new_grid(&mut self, center: ImageData) {
        self.token += 1;
        self.grid_epoch += 1;
        self.indices = vec![CENTER_CELL];
        self.cache.clear();
        self.cache.insert(CENTER_CELL, center);
    }

    /// Cached extraction of a cell of the current grid.
    pub fn cached(&self, index: CellIndex) -> Option<&ImageData> {
        self.cache.get(&index)
    }

    /// Cache extracted cells if they came from the current grid.
    pub fn remember(
        &mut self,
        grid_epoch: u64,
        cells: impl IntoIterator<Item = (CellIndex, ImageData)>,
    ) {
        if grid_epoch == self.grid_epoch {
            self.cache.extend(cells);
        }
    }
}
