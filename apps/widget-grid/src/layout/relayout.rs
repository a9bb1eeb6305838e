//! Proportional re-layout after a grid geometry change (rotation, device class change).
//!
//! Each widget keeps its relative centre: the centre's fraction of the old grid is mapped onto
//! the new grid, converted back to a top-left cell and clamped into bounds. Widgets are visited
//! in `(page, row, column)` order so top-left, earlier-page widgets claim contested cells first.
//!
//! Placement priority per widget, against the working set of already re-placed widgets only:
//! 1. the desired position itself
//! 2. the nearest free position to it. `find_nearest_position` ends with a row-major scan from
//!    the desired page, which is the widget's own page, so this also covers the first free
//!    position anywhere.
//!
//! A widget that fits nowhere is dropped. That only happens when the new grid's total capacity
//! is smaller than the area the widgets need.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::layout::geometry::{Grid, GridGeometry};
use crate::layout::oracle::is_free;
use crate::layout::search::find_nearest_position;
use crate::models::{Position, Widget, WidgetId};

/// Result of a re-layout: surviving widgets (caller's insertion order) and the ids that
/// could not be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Relayout {
    pub widgets: Vec<Widget>,
    pub dropped: Vec<WidgetId>,
}

/// Where `widget` would ideally land on `new_grid`, keeping its relative centre from `old`.
///
/// Rounding is `f64::round` (half away from zero) before clamping, so for every value that
/// survives the clamp it behaves as round-half-up.
pub fn desired_position(widget: &Widget, old: &GridGeometry, new_grid: &Grid) -> Position {
    let cells = widget.cells();
    let new = new_grid.geometry();

    let column = scale_axis(
        widget.position.column,
        cells.width,
        old.columns(),
        new.columns(),
    );
    let row = scale_axis(widget.position.row, cells.height, old.rows(), new.rows());

    Position {
        row,
        column,
        page: widget.position.page.min(new_grid.max_pages() - 1),
    }
}

/// Maps a span's start along one axis from an `old_len` grid onto a `new_len` grid.
fn scale_axis(start: usize, span: usize, old_len: usize, new_len: usize) -> usize {
    let half = span as f64 / 2.0;
    let relative_center = (start as f64 + half) / old_len as f64;
    let desired = (relative_center * new_len as f64 - half).round();
    let max_start = new_len.saturating_sub(span) as f64;
    desired.clamp(0.0, max_start) as usize
}

/// Re-places every widget for `new_grid`. Deterministic for the same inputs.
pub fn relayout(widgets: &[Widget], old: &GridGeometry, new_grid: &Grid) -> Relayout {
    let mut order: Vec<&Widget> = widgets.iter().collect();
    order.sort_by_key(|w| w.position.reading_order());

    let mut placed: Vec<Widget> = Vec::with_capacity(widgets.len());
    let mut dropped = Vec::new();

    for widget in order {
        let desired = desired_position(widget, old, new_grid);
        debug!(
            id = %widget.id,
            from_row = widget.position.row,
            from_column = widget.position.column,
            row = desired.row,
            column = desired.column,
            page = desired.page,
            "Re-layout: desired position"
        );

        let position = if is_free(new_grid, widget.size, desired, Some(widget.id), &placed) {
            Some(desired)
        } else {
            let nearest =
                find_nearest_position(new_grid, widget.size, desired, Some(widget.id), &placed);
            if let Some(p) = nearest {
                debug!(id = %widget.id, row = p.row, column = p.column, page = p.page, "Re-layout: nearest position");
            }
            nearest
        };

        match position {
            Some(position) => placed.push(widget.with_position(position)),
            None => {
                warn!(id = %widget.id, size = %widget.size, "Re-layout: no position left, widget dropped");
                dropped.push(widget.id);
            }
        }
    }

    // Restore the caller's insertion order.
    let index: HashMap<WidgetId, usize> = widgets
        .iter()
        .enumerate()
        .map(|(i, w)| (w.id, i))
        .collect();
    placed.sort_by_key(|w| index.get(&w.id).copied().unwrap_or(usize::MAX));

    Relayout {
        widgets: placed,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::oracle::validate;
    use crate::models::{SizeClass, WidgetKind};

    fn geometry(columns: usize, rows: usize) -> GridGeometry {
        GridGeometry::new(columns, rows, 40.0).unwrap()
    }

    fn widget(kind: WidgetKind, size: SizeClass, row: usize, column: usize, page: usize) -> Widget {
        Widget {
            id: WidgetId::new(),
            kind,
            size,
            position: Position::new(row, column, page),
            theme: None,
        }
    }

    // ── desired_position ────────────────────────────────────────────────────

    #[test]
    fn test_rotation_rounds_half_up() {
        // 4x8 → 8x4. Centre (0.5, 0.5) → relative (0.125, 0.0625).
        // column: 0.125 * 8 - 0.5 = 0.5 → 1; row: 0.0625 * 4 - 0.5 = -0.25 → 0.
        let w = widget(WidgetKind::SpeedGauge, SizeClass::Small, 0, 0, 0);
        let new_grid = Grid::new(geometry(8, 4), 5);
        assert_eq!(
            desired_position(&w, &geometry(4, 8), &new_grid),
            Position::new(0, 1, 0)
        );
    }

    #[test]
    fn test_desired_position_is_clamped() {
        // Bottom-right 2x2 on 4x8 → 8x4: row 6 centre 7/8 → 0.875*4 - 1 = 2.5 → 3, clamped to 2.
        let w = widget(WidgetKind::GForceDot, SizeClass::Large, 6, 2, 0);
        let new_grid = Grid::new(geometry(8, 4), 5);
        let desired = desired_position(&w, &geometry(4, 8), &new_grid);
        assert_eq!(desired.row, 2);
        assert_eq!(desired.column, 5);
    }

    #[test]
    fn test_same_shape_keeps_position() {
        let w = widget(WidgetKind::Seismograph, SizeClass::MediumVertical, 3, 2, 1);
        let g = geometry(4, 8);
        let grid = Grid::new(g, 5);
        assert_eq!(desired_position(&w, &g, &grid), w.position);
    }

    // ── relayout ────────────────────────────────────────────────────────────

    #[test]
    fn test_relayout_keeps_insertion_order_and_invariant() {
        let widgets = vec![
            widget(WidgetKind::Speedometer, SizeClass::Large, 4, 0, 0),
            widget(WidgetKind::SpeedGauge, SizeClass::Small, 0, 0, 0),
            widget(WidgetKind::UnitToggle, SizeClass::MediumHorizontal, 0, 2, 1),
        ];
        let new_grid = Grid::new(geometry(8, 4), 5);
        let result = relayout(&widgets, &geometry(4, 8), &new_grid);

        assert!(result.dropped.is_empty());
        let ids: Vec<_> = result.widgets.iter().map(|w| w.id).collect();
        let expected: Vec<_> = widgets.iter().map(|w| w.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(validate(&new_grid, &result.widgets), Ok(()));
    }

    #[test]
    fn test_earlier_widget_wins_contested_cell() {
        // Two 1x1 widgets at (0,0) and (0,1) on 4 columns collapse onto 2 columns:
        // both want column 0; the first in reading order keeps it.
        let first = widget(WidgetKind::SpeedGauge, SizeClass::Small, 0, 0, 0);
        let second = widget(WidgetKind::SpeedGauge, SizeClass::Small, 0, 1, 0);
        let new_grid = Grid::new(geometry(2, 1), 1);
        let result = relayout(&[second.clone(), first.clone()], &geometry(4, 1), &new_grid);

        let placed_first = result.widgets.iter().find(|w| w.id == first.id).unwrap();
        let placed_second = result.widgets.iter().find(|w| w.id == second.id).unwrap();
        assert_eq!(placed_first.position, Position::new(0, 0, 0));
        assert_eq!(placed_second.position, Position::new(0, 1, 0));
    }

    #[test]
    fn test_shrinking_capacity_drops_latest_widgets() {
        let widgets: Vec<Widget> = (0..4)
            .map(|c| widget(WidgetKind::SpeedGauge, SizeClass::Small, 0, c, 0))
            .collect();
        let new_grid = Grid::new(geometry(1, 2), 1);
        let result = relayout(&widgets, &geometry(4, 1), &new_grid);

        assert_eq!(result.widgets.len(), 2);
        assert_eq!(result.dropped, vec![widgets[2].id, widgets[3].id]);
        assert_eq!(validate(&new_grid, &result.widgets), Ok(()));
    }

    #[test]
    fn test_full_page_spills_to_later_pages() {
        // 2x1 → 1x1: one cell per page. B loses (0,0,0) to A and takes page 1,
        // which pushes C off its own page onto page 2.
        let a = widget(WidgetKind::SpeedGauge, SizeClass::Small, 0, 0, 0);
        let b = widget(WidgetKind::SpeedGauge, SizeClass::Small, 0, 1, 0);
        let c = widget(WidgetKind::SpeedGauge, SizeClass::Small, 0, 0, 1);
        let new_grid = Grid::new(geometry(1, 1), 3);
        let result = relayout(&[a, b, c], &geometry(2, 1), &new_grid);

        assert!(result.dropped.is_empty());
        let pages: Vec<_> = result.widgets.iter().map(|w| w.position.page).collect();
        assert_eq!(pages, vec![0, 1, 2]);
        assert_eq!(validate(&new_grid, &result.widgets), Ok(()));
    }

    #[test]
    fn test_widget_wider_than_new_grid_is_dropped() {
        let wide = widget(WidgetKind::Speedometer, SizeClass::ExtraLarge, 0, 0, 0);
        let new_grid = Grid::new(geometry(2, 4), 2);
        let result = relayout(&[wide.clone()], &geometry(4, 8), &new_grid);
        assert!(result.widgets.is_empty());
        assert_eq!(result.dropped, vec![wide.id]);
    }

    #[test]
    fn test_relayout_is_deterministic() {
        let widgets = vec![
            widget(WidgetKind::GForceDot, SizeClass::Large, 0, 0, 0),
            widget(WidgetKind::GForceDot, SizeClass::Large, 0, 2, 0),
            widget(WidgetKind::Seismograph, SizeClass::ExtraLarge, 2, 0, 0),
            widget(WidgetKind::SpeedGauge, SizeClass::Small, 7, 3, 0),
        ];
        let new_grid = Grid::new(geometry(8, 4), 5);
        let a = relayout(&widgets, &geometry(4, 8), &new_grid);
        let b = relayout(&widgets, &geometry(4, 8), &new_grid);
        assert_eq!(a, b);
    }
}
