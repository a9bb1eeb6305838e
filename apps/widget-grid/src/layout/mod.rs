// Grid layout: geometry, collision oracle, placement search, re-layout and drag arithmetic.
// Everything here is pure except `engine`, which owns the widget collection and commits.

pub mod drag;
pub mod engine;
pub mod geometry;
pub mod oracle;
pub mod relayout;
pub mod search;

// Re-export the public API consumed by the shared state and embedders.
pub use engine::{LayoutEngine, NewWidget};
pub use geometry::{DeviceClass, Grid, GridGeometry, Orientation, DEFAULT_MAX_PAGES};
pub use oracle::{is_free, validate, Conflict};
pub use relayout::{relayout, Relayout};
pub use search::{find_free_position, find_nearest_position};
