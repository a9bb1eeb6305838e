//! Placement search: where a widget of a given size can legally go.
//!
//! # Strategies
//! - `find_free_position`: first free slot in row-major order (top-left bias), preferred page
//!   first, then every other page ascending.
//! - `find_nearest_position`: expanding Chebyshev ring around a target cell on the target's
//!   page, falling back to `find_free_position` so a legal slot anywhere is never missed.

use crate::layout::geometry::Grid;
use crate::layout::oracle::is_free;
use crate::models::{Position, SizeClass, Widget, WidgetId};

/// First free position for `size`, scanning `preferred_page` first and then the remaining
/// pages in ascending order. Within a page rows are scanned top to bottom, columns left to right.
pub fn find_free_position(
    grid: &Grid,
    size: SizeClass,
    preferred_page: Option<usize>,
    excluding: Option<WidgetId>,
    against: &[Widget],
) -> Option<Position> {
    let cells = size.cells();
    let geometry = grid.geometry();
    if !geometry.fits(cells) {
        return None;
    }
    let last_row = geometry.rows() - cells.height;
    let last_column = geometry.columns() - cells.width;

    for page in grid.page_order(preferred_page) {
        for row in 0..=last_row {
            for column in 0..=last_column {
                let position = Position::new(row, column, page);
                if is_free(grid, size, position, excluding, against) {
                    return Some(position);
                }
            }
        }
    }
    None
}

/// Free position closest to `target`, measured as Chebyshev distance of the top-left cell.
///
/// The page is fixed to `target.page` (clamped into range) while rings of radius
/// `0..=max(rows, columns) / 2` are searched; each ring tries every cell of the square it
/// bounds, row-major. If no ring yields a slot the search widens to any page.
pub fn find_nearest_position(
    grid: &Grid,
    size: SizeClass,
    target: Position,
    excluding: Option<WidgetId>,
    against: &[Widget],
) -> Option<Position> {
    let cells = size.cells();
    let geometry = grid.geometry();
    let page = target.page.min(grid.max_pages() - 1);

    if geometry.fits(cells) {
        let last_row = geometry.rows() - cells.height;
        let last_column = geometry.columns() - cells.width;
        let max_radius = geometry.rows().max(geometry.columns()) / 2;

        for distance in 0..=max_radius {
            let rows = target.row.saturating_sub(distance)
                ..=last_row.min(target.row.saturating_add(distance));
            for row in rows {
                let columns = target.column.saturating_sub(distance)
                    ..=last_column.min(target.column.saturating_add(distance));
                for column in columns {
                    let position = Position::new(row, column, page);
                    if is_free(grid, size, position, excluding, against) {
                        return Some(position);
                    }
                }
            }
        }
    }

    find_free_position(grid, size, Some(page), excluding, against)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::GridGeometry;
    use crate::models::WidgetKind;

    fn grid(columns: usize, rows: usize, max_pages: usize) -> Grid {
        Grid::new(GridGeometry::new(columns, rows, 50.0).unwrap(), max_pages)
    }

    fn small(row: usize, column: usize, page: usize) -> Widget {
        Widget {
            id: WidgetId::new(),
            kind: WidgetKind::SpeedGauge,
            size: SizeClass::Small,
            position: Position::new(row, column, page),
            theme: None,
        }
    }

    fn fill_page(grid: &Grid, page: usize) -> Vec<Widget> {
        let g = grid.geometry();
        (0..g.rows())
            .flat_map(|r| (0..g.columns()).map(move |c| small(r, c, page)))
            .collect()
    }

    // ── find_free_position ──────────────────────────────────────────────────

    #[test]
    fn test_empty_grid_returns_origin() {
        let g = grid(4, 8, 5);
        assert_eq!(
            find_free_position(&g, SizeClass::Large, None, None, &[]),
            Some(Position::new(0, 0, 0))
        );
    }

    #[test]
    fn test_row_major_scan() {
        let g = grid(4, 8, 1);
        let placed = vec![small(0, 0, 0)];
        assert_eq!(
            find_free_position(&g, SizeClass::Small, None, None, &placed),
            Some(Position::new(0, 1, 0))
        );
        // A 2x2 cannot start in row 0 at column 0; column 1 is the first fit.
        assert_eq!(
            find_free_position(&g, SizeClass::Large, None, None, &placed),
            Some(Position::new(0, 1, 0))
        );
    }

    #[test]
    fn test_preferred_page_scanned_first() {
        let g = grid(4, 8, 3);
        assert_eq!(
            find_free_position(&g, SizeClass::Small, Some(2), None, &[]),
            Some(Position::new(0, 0, 2))
        );
    }

    #[test]
    fn test_falls_through_to_other_pages() {
        let g = grid(2, 2, 3);
        let mut placed = fill_page(&g, 1);
        placed.extend(fill_page(&g, 0));
        assert_eq!(
            find_free_position(&g, SizeClass::Small, Some(1), None, &placed),
            Some(Position::new(0, 0, 2))
        );
    }

    #[test]
    fn test_exhausted_grid_returns_none() {
        let g = grid(1, 1, 2);
        let placed = vec![small(0, 0, 0), small(0, 0, 1)];
        assert_eq!(find_free_position(&g, SizeClass::Small, None, None, &placed), None);
    }

    #[test]
    fn test_oversized_footprint_returns_none() {
        let g = grid(2, 1, 2);
        assert_eq!(find_free_position(&g, SizeClass::Large, None, None, &[]), None);
        assert_eq!(
            find_nearest_position(&g, SizeClass::Large, Position::new(0, 0, 0), None, &[]),
            None
        );
    }

    // ── find_nearest_position ───────────────────────────────────────────────

    #[test]
    fn test_nearest_returns_target_when_free() {
        let g = grid(4, 8, 1);
        assert_eq!(
            find_nearest_position(&g, SizeClass::Small, Position::new(5, 3, 0), None, &[]),
            Some(Position::new(5, 3, 0))
        );
    }

    #[test]
    fn test_nearest_prefers_proximity_over_row_major() {
        let g = grid(4, 8, 1);
        let placed = vec![small(6, 2, 0)];
        // Row-major would return (0,0); the ring finds a neighbour of (6,2).
        let found =
            find_nearest_position(&g, SizeClass::Small, Position::new(6, 2, 0), None, &placed)
                .unwrap();
        assert_eq!(found, Position::new(5, 1, 0));
        let distance = found.row.abs_diff(6).max(found.column.abs_diff(2));
        assert_eq!(distance, 1);
    }

    #[test]
    fn test_nearest_stays_on_target_page() {
        let g = grid(4, 4, 3);
        let placed = vec![small(0, 0, 1)];
        let found =
            find_nearest_position(&g, SizeClass::Small, Position::new(0, 0, 1), None, &placed);
        assert_eq!(found.map(|p| p.page), Some(1));
    }

    #[test]
    fn test_nearest_clamps_page() {
        let g = grid(4, 4, 2);
        let found = find_nearest_position(&g, SizeClass::Small, Position::new(0, 0, 7), None, &[]);
        assert_eq!(found, Some(Position::new(0, 0, 1)));
    }

    #[test]
    fn test_nearest_falls_back_to_other_pages() {
        let g = grid(2, 2, 2);
        let placed = fill_page(&g, 0);
        assert_eq!(
            find_nearest_position(&g, SizeClass::Small, Position::new(1, 1, 0), None, &placed),
            Some(Position::new(0, 0, 1))
        );
    }

    #[test]
    fn test_nearest_from_far_out_target_falls_back_to_scan() {
        let g = grid(4, 8, 2);
        let placed = vec![small(0, 0, 1)];
        assert_eq!(
            find_nearest_position(
                &g,
                SizeClass::Small,
                Position::new(usize::MAX, usize::MAX, 1),
                None,
                &placed
            ),
            Some(Position::new(0, 1, 1))
        );
    }

    #[test]
    fn test_nearest_ignores_excluded_widget() {
        let g = grid(2, 2, 1);
        let placed = fill_page(&g, 0);
        let me = placed[3].id;
        assert_eq!(
            find_nearest_position(&g, SizeClass::Small, Position::new(0, 0, 0), Some(me), &placed),
            Some(Position::new(1, 1, 0))
        );
    }
}
