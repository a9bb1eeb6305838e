//! Grid geometry: how many cells a page has and how large they are on screen.
//!
//! A geometry is a value. A rotation or a device change produces a new `GridGeometry`;
//! the engine compares old and new and re-lays widgets out only when they differ.

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;
use crate::models::{CellSize, Position};

/// Cell sizes closer than this are the same geometry.
pub const CELL_SIZE_EPSILON: f64 = 0.01;

/// Pages available when no configuration says otherwise.
pub const DEFAULT_MAX_PAGES: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Device policy
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Phone,
    Tablet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Landscape only when strictly wider than tall.
    pub fn of(width: f64, height: f64) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

impl DeviceClass {
    /// `(columns, rows)` for this device class in the given orientation.
    pub const fn grid_dimensions(self, orientation: Orientation) -> (usize, usize) {
        match (self, orientation) {
            (DeviceClass::Phone, Orientation::Portrait) => (4, 8),
            (DeviceClass::Phone, Orientation::Landscape) => (8, 4),
            (DeviceClass::Tablet, Orientation::Portrait) => (6, 12),
            (DeviceClass::Tablet, Orientation::Landscape) => (12, 6),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// One page's grid: `columns × rows` square cells of `cell_size` points.
///
/// Equality is exact on the cell counts and approximate (`CELL_SIZE_EPSILON`) on the cell size.
#[derive(Debug, Clone, Copy)]
pub struct GridGeometry {
    columns: usize,
    rows: usize,
    cell_size: f64,
}

impl GridGeometry {
    pub fn new(columns: usize, rows: usize, cell_size: f64) -> Result<Self, LayoutError> {
        if columns == 0 || rows == 0 || !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(LayoutError::InvalidGeometry {
                columns,
                rows,
                cell_size,
            });
        }
        Ok(Self {
            columns,
            rows,
            cell_size,
        })
    }

    /// Derives the geometry for an available area on a device.
    ///
    /// Cells are square: the cell size is the smaller of the per-column width and the per-row
    /// height, so the whole grid always fits in the available area.
    pub fn for_device(width: f64, height: f64, device: DeviceClass) -> Result<Self, LayoutError> {
        let (columns, rows) = device.grid_dimensions(Orientation::of(width, height));
        let cell_size = (width / columns as f64).min(height / rows as f64);
        Self::new(columns, rows, cell_size)
    }

    pub const fn columns(&self) -> usize {
        self.columns
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub const fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// True when a footprint of this size fits on an empty page at all.
    pub const fn fits(&self, size: CellSize) -> bool {
        size.width <= self.columns && size.height <= self.rows
    }
}

impl PartialEq for GridGeometry {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.rows == other.rows
            && (self.cell_size - other.cell_size).abs() < CELL_SIZE_EPSILON
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Grid: geometry plus page bound
// ────────────────────────────────────────────────────────────────────────────

/// The full placement space: `max_pages` independent pages sharing one geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    geometry: GridGeometry,
    max_pages: usize,
}

impl Grid {
    /// `max_pages` below one is raised to one: there is always a page to place on.
    pub fn new(geometry: GridGeometry, max_pages: usize) -> Self {
        Self {
            geometry,
            max_pages: max_pages.max(1),
        }
    }

    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub const fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Same page bound, new geometry.
    pub fn with_geometry(&self, geometry: GridGeometry) -> Self {
        Self {
            geometry,
            max_pages: self.max_pages,
        }
    }

    /// True when `size` at `position` lies inside the page and the page exists.
    ///
    /// Positions come from decoded blobs and callers, so coordinates near `usize::MAX` are
    /// possible; an overflowing far edge is out of bounds.
    pub fn contains(&self, size: CellSize, position: Position) -> bool {
        position
            .row
            .checked_add(size.height)
            .is_some_and(|bottom| bottom <= self.geometry.rows)
            && position
                .column
                .checked_add(size.width)
                .is_some_and(|right| right <= self.geometry.columns)
            && position.page < self.max_pages
    }

    /// Clamps a requested position so a widget of `size` lies inside the grid.
    ///
    /// A footprint larger than the page clamps to the origin; `contains` still rejects it.
    pub fn clamp(&self, size: CellSize, position: Position) -> Position {
        Position {
            row: position
                .row
                .min(self.geometry.rows.saturating_sub(size.height)),
            column: position
                .column
                .min(self.geometry.columns.saturating_sub(size.width)),
            page: position.page.min(self.max_pages - 1),
        }
    }

    /// Pages in scan order: the preferred page first (clamped into range), then the rest ascending.
    pub fn page_order(&self, preferred: Option<usize>) -> Vec<usize> {
        match preferred {
            Some(page) => {
                let first = page.min(self.max_pages - 1);
                std::iter::once(first)
                    .chain((0..self.max_pages).filter(|p| *p != first))
                    .collect()
            }
            None => (0..self.max_pages).collect(),
        }
    }
}
