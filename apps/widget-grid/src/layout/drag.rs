//! Drag-gesture arithmetic: view coordinates ↔ grid cells.
//!
//! These are pure helpers for the UI layer. They never mutate layout state; a drop is only
//! committed through `LayoutEngine::move_widget`, which re-clamps and collision-checks.

use serde::{Deserialize, Serialize};

use crate::layout::geometry::GridGeometry;
use crate::models::{CellSize, Position};

/// Fraction of the screen width at either edge that triggers a page switch while dragging.
pub const EDGE_SWITCH_FRACTION: f64 = 0.1;

/// A point in view coordinates (points, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Centre of a placed widget in the grid view's coordinate space.
pub fn widget_center(position: Position, size: CellSize, cell_size: f64, padding: f64) -> Point {
    Point {
        x: (position.column as f64 + size.width as f64 / 2.0) * cell_size + padding,
        y: (position.row as f64 + size.height as f64 / 2.0) * cell_size + padding,
    }
}

/// Grid position for a drop at `point` (global coordinates) on a grid whose frame starts at
/// `frame_origin`. Cell indices truncate toward zero and negative results saturate to 0.
///
/// The result is not clamped to the far edges; `move_widget` does that with the widget's size.
pub fn drop_position(
    point: Point,
    frame_origin: Point,
    padding: f64,
    geometry: &GridGeometry,
    page: usize,
) -> Position {
    let cell = geometry.cell_size();
    let local_x = point.x - frame_origin.x;
    let local_y = point.y - frame_origin.y;
    Position {
        row: cell_index((local_y - padding - cell / 2.0) / cell),
        column: cell_index((local_x - padding - cell / 2.0) / cell),
        page,
    }
}

/// Live snap target while dragging: the cell under `point` (below a `top_inset`), clamped so a
/// widget of `size` stays inside the page.
pub fn snap_position(
    point: Point,
    top_inset: f64,
    size: CellSize,
    geometry: &GridGeometry,
    page: usize,
) -> Position {
    let cell = geometry.cell_size();
    let column = cell_index(point.x / cell);
    let row = cell_index((point.y - top_inset) / cell);
    Position {
        row: row.min(geometry.rows().saturating_sub(size.height)),
        column: column.min(geometry.columns().saturating_sub(size.width)),
        page,
    }
}

/// Page to switch to when a drag lingers near a screen edge, if any.
pub fn edge_page_target(
    x: f64,
    screen_width: f64,
    selected_page: usize,
    page_count: usize,
) -> Option<usize> {
    let threshold = screen_width * EDGE_SWITCH_FRACTION;
    if x < threshold && selected_page > 0 {
        Some(selected_page - 1)
    } else if x > screen_width - threshold && selected_page.saturating_add(1) < page_count {
        Some(selected_page + 1)
    } else {
        None
    }
}

/// Truncates toward zero; negatives and NaN become 0.
fn cell_index(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value.trunc() as usize
    } else {
        0
    }
}
