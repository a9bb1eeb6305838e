//! Widget persistence: an opaque keyed blob store plus the codec for the widget list.
//!
//! The blob is a JSON array of widget records. Decoding failures are the caller's cue to start
//! from an empty layout; they are never surfaced to the user.
//!
//! `WidgetStore` is a trait so hosts can plug in their own key-value backend. The engine holds
//! it as `Arc<dyn WidgetStore>`.

pub mod file;
pub mod memory;

use std::collections::HashSet;

use tracing::warn;

use crate::errors::StoreError;
use crate::layout::geometry::Grid;
use crate::layout::oracle::is_free;
use crate::layout::search::find_free_position;
use crate::models::Widget;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key used when nothing else is configured.
pub const DEFAULT_STORE_KEY: &str = "widgets";

/// Keyed blob storage. Implementations must be safe to share across threads.
pub trait WidgetStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Keys are used as file names by `FileStore`, so they are restricted to `[A-Za-z0-9._-]`
/// and may not start with a dot.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Codec
// ────────────────────────────────────────────────────────────────────────────

pub fn encode_widgets(widgets: &[Widget]) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec(widgets)?)
}

pub fn decode_widgets(bytes: &[u8]) -> Result<Vec<Widget>, StoreError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Admits decoded widgets into a layout that satisfies the overlap invariant on `grid`.
///
/// Records are taken in stored order. Duplicates and unsupported sizes are discarded. A record
/// whose rectangle is illegal (out of bounds, or overlapping an earlier record) is re-placed
/// on its own page first, then anywhere; if nothing is free it is discarded.
pub fn restore_widgets(grid: &Grid, decoded: Vec<Widget>) -> Vec<Widget> {
    let mut admitted: Vec<Widget> = Vec::with_capacity(decoded.len());
    let mut seen = HashSet::with_capacity(decoded.len());

    for widget in decoded {
        if !seen.insert(widget.id) {
            warn!(id = %widget.id, "Discarding stored widget with duplicate id");
            continue;
        }
        if !widget.kind.supports(widget.size) {
            warn!(id = %widget.id, kind = %widget.kind, size = %widget.size, "Discarding stored widget with unsupported size");
            continue;
        }
        if is_free(grid, widget.size, widget.position, None, &admitted) {
            admitted.push(widget);
            continue;
        }
        match find_free_position(grid, widget.size, Some(widget.position.page), None, &admitted) {
            Some(position) => {
                warn!(id = %widget.id, page = position.page, row = position.row, column = position.column, "Stored widget position illegal, re-placed");
                admitted.push(widget.with_position(position));
            }
            None => {
                warn!(id = %widget.id, "Stored widget fits nowhere, discarded");
            }
        }
    }
    admitted
}
