//! Widget grid layout engine for a paginated dashboard.
//!
//! Widgets occupy rectangular footprints on a `columns × rows` grid repeated across up to
//! `max_pages` pages. The engine guarantees that committed widgets never overlap and never leave
//! the grid, and re-lays everything out proportionally when the viewport changes.
//!
//! ```no_run
//! use widget_grid::{init_tracing, EngineConfig, DeviceClass, GridGeometry, LayoutEngine,
//!                   NewWidget, SharedLayout, WidgetKind};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = EngineConfig::from_env()?;
//! init_tracing(&config);
//!
//! let geometry = GridGeometry::for_device(390.0, 760.0, DeviceClass::Phone)?;
//! let layout = SharedLayout::new(LayoutEngine::from_config(&config, geometry)?);
//! layout.add_widget(NewWidget::new(WidgetKind::Speedometer))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod events;
pub mod layout;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;

pub use config::EngineConfig;
pub use errors::{LayoutError, StoreError};
pub use events::{LayoutEvent, NoSpace, NoSpaceContext};
pub use layout::{DeviceClass, Grid, GridGeometry, LayoutEngine, NewWidget};
pub use logging::init_tracing;
pub use models::{Position, SizeClass, Widget, WidgetId, WidgetKind, WidgetTheme};
pub use state::SharedLayout;
pub use store::{FileStore, MemoryStore, WidgetStore};
