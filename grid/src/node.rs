//! Per-cell records owned by the grid engine.

use motherboard_defense_core::CellCoord;

/// Durable record of a single cell owned by a [`crate::GridEngine`].
///
/// Only the occupancy flag ever changes, and only through the engine. Search
/// bookkeeping lives in a per-query [`crate::search::SearchContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridNode {
    coord: CellCoord,
    occupied: bool,
}

impl GridNode {
    pub(crate) const fn new(coord: CellCoord, occupied: bool) -> Self {
        Self { coord, occupied }
    }

    /// Coordinate identifying the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Reports whether the cell blocks traversal.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub(crate) fn set_occupied(&mut self, occupied: bool) {
        self.occupied = occupied;
    }
}
