use thiserror::Error;

use crate::events::NoSpace;
use crate::models::{SizeClass, WidgetId, WidgetKind};

/// Layout-level error type.
///
/// Every variant is recoverable: an operation that returns one of these has left the
/// widget collection exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("{kind} widgets cannot be shown at size {size}")]
    InvalidSize { kind: WidgetKind, size: SizeClass },

    #[error("No space: {0}")]
    NoSpace(NoSpace),

    #[error("Unknown widget: {0}")]
    UnknownWidget(WidgetId),

    #[error("Invalid grid geometry: {columns}x{rows} cells of {cell_size}")]
    InvalidGeometry {
        columns: usize,
        rows: usize,
        cell_size: f64,
    },
}

impl LayoutError {
    /// True for the conditions a UI should surface to the user (a transient notice).
    pub fn is_user_facing(&self) -> bool {
        matches!(self, LayoutError::NoSpace(_))
    }
}

/// Persistence failures. These never leave the engine: they are logged and dropped,
/// because the committed state is already held in memory.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),
}
