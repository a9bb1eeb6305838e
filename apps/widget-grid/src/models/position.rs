//! Grid coordinates and cell-space rectangles.

use serde::{Deserialize, Serialize};

use crate::models::widget::CellSize;

/// Top-left cell of a widget on one page of the grid.
///
/// Ordering is `(page, row, column)`, the order in which re-layout visits widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
    pub page: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize, page: usize) -> Self {
        Self { row, column, page }
    }

    /// Key used to sort widgets top-left first, earlier pages first.
    pub const fn reading_order(&self) -> (usize, usize, usize) {
        (self.page, self.row, self.column)
    }
}

/// Axis-aligned rectangle in cell units. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl CellRect {
    /// Far edges saturate at `usize::MAX`; such a rectangle is never inside a grid.
    pub fn at(position: Position, size: CellSize) -> Self {
        Self {
            left: position.column,
            top: position.row,
            right: position.column.saturating_add(size.width),
            bottom: position.row.saturating_add(size.height),
        }
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &CellRect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    pub fn area(&self) -> usize {
        (self.right - self.left) * (self.bottom - self.top)
    }
}
