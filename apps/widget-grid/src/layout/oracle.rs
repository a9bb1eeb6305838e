//! Occupancy oracle: the bounds and no-overlap predicate every placement decision goes through.
//!
//! Pages are independent occupancy planes: widgets on other pages are never compared.
//! The `against` slice lets callers test a hypothetical working set instead of the committed one.

use std::collections::HashSet;

use crate::layout::geometry::Grid;
use crate::models::{CellRect, Position, SizeClass, Widget, WidgetId};

/// True if a widget of `size` can sit at `position` without leaving the grid or overlapping
/// any widget in `against` on the same page. The widget `excluding` (if any) is ignored.
pub fn is_free(
    grid: &Grid,
    size: SizeClass,
    position: Position,
    excluding: Option<WidgetId>,
    against: &[Widget],
) -> bool {
    let cells = size.cells();
    if !grid.contains(cells, position) {
        return false;
    }

    let candidate = CellRect::at(position, cells);
    against
        .iter()
        .filter(|w| Some(w.id) != excluding && w.position.page == position.page)
        .all(|w| !w.rect().intersects(&candidate))
}

/// A broken layout invariant, reported by `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    DuplicateId(WidgetId),
    UnsupportedSize(WidgetId),
    OutOfBounds(WidgetId),
    Overlap(WidgetId, WidgetId),
}

/// Checks the global layout invariant over a whole widget list: unique ids, supported sizes,
/// every rectangle inside the grid, and no two rectangles overlapping on the same page.
pub fn validate(grid: &Grid, widgets: &[Widget]) -> Result<(), Conflict> {
    let mut seen = HashSet::with_capacity(widgets.len());
    for (i, widget) in widgets.iter().enumerate() {
        if !seen.insert(widget.id) {
            return Err(Conflict::DuplicateId(widget.id));
        }
        if !widget.kind.supports(widget.size) {
            return Err(Conflict::UnsupportedSize(widget.id));
        }
        if !grid.contains(widget.cells(), widget.position) {
            return Err(Conflict::OutOfBounds(widget.id));
        }
        let rect = widget.rect();
        if let Some(other) = widgets[..i]
            .iter()
            .find(|o| o.position.page == widget.position.page && o.rect().intersects(&rect))
        {
            return Err(Conflict::Overlap(other.id, widget.id));
        }
    }
    Ok(())
}
