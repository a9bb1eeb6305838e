// Data model shared by the oracle, the placement search and the engine.
// Everything here is plain data: the static kind/size tables live next to the enums they describe.

pub mod position;
pub mod widget;

pub use position::{CellRect, Position};
pub use widget::{CellSize, SizeClass, Widget, WidgetId, WidgetKind, WidgetTheme};
