//! Layout engine: owns the widget collection and every operation that mutates it.
//!
//! # Commit discipline
//! Each mutating operation either fully commits or leaves the collection untouched. A commit
//! is followed by a best-effort write to the store and a `LayoutEvent` on the broadcast
//! channel. `NoSpace` rejections are also broadcast so the UI can show a transient notice.
//!
//! The engine is single-writer and synchronous. For shared access wrap it in
//! [`crate::state::SharedLayout`].

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::errors::LayoutError;
use crate::events::{EventBus, LayoutEvent, NoSpace, NoSpaceContext};
use crate::layout::geometry::{DeviceClass, Grid, GridGeometry};
use crate::layout::oracle::{is_free, validate};
use crate::layout::relayout::{relayout, Relayout};
use crate::layout::search::{find_free_position, find_nearest_position};
use crate::models::{Position, SizeClass, Widget, WidgetId, WidgetKind, WidgetTheme};
use crate::store::{
    decode_widgets, encode_widgets, restore_widgets, validate_key, FileStore, MemoryStore, WidgetStore,
    DEFAULT_STORE_KEY,
};

/// Parameters for adding a widget. Unset fields take the kind's defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewWidget {
    pub kind: WidgetKind,
    /// Defaults to the kind's first supported size.
    pub size: Option<SizeClass>,
    pub theme: Option<WidgetTheme>,
    /// Page to try first; every other page is still scanned if it is full.
    pub page: Option<usize>,
}

impl NewWidget {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            size: None,
            theme: None,
            page: None,
        }
    }

    pub fn size(mut self, size: SizeClass) -> Self {
        self.size = Some(size);
        self
    }

    pub fn theme(mut self, theme: WidgetTheme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

pub struct LayoutEngine {
    widgets: Vec<Widget>,
    grid: Grid,
    store: Arc<dyn WidgetStore>,
    store_key: String,
    events: EventBus,
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("widgets", &self.widgets)
            .field("grid", &self.grid)
            .field("store_key", &self.store_key)
            .finish_non_exhaustive()
    }
}

impl LayoutEngine {
    /// Empty, in-memory engine.
    pub fn new(grid: Grid) -> Self {
        Self {
            widgets: Vec::new(),
            grid,
            store: Arc::new(MemoryStore::new()),
            store_key: DEFAULT_STORE_KEY.to_string(),
            events: EventBus::new(),
        }
    }

    /// Engine backed by `store`, starting from whatever is persisted under `key`.
    ///
    /// Missing, unreadable or corrupt data starts an empty layout.
    pub fn with_store(grid: Grid, store: Arc<dyn WidgetStore>, key: impl Into<String>) -> Self {
        let store_key = key.into();
        let widgets = load_widgets(&grid, store.as_ref(), &store_key);
        Self {
            widgets,
            grid,
            store,
            store_key,
            events: EventBus::new(),
        }
    }

    /// Builds the store described by `config` (file-backed when a directory is set) and loads.
    pub fn from_config(config: &EngineConfig, geometry: GridGeometry) -> Result<Self> {
        validate_key(&config.store_key)?;
        let store: Arc<dyn WidgetStore> = match &config.store_dir {
            Some(dir) => Arc::new(FileStore::new(dir)),
            None => Arc::new(MemoryStore::new()),
        };
        let grid = Grid::new(geometry, config.max_pages);
        Ok(Self::with_store(grid, store, config.store_key.clone()))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Read accessors
    // ────────────────────────────────────────────────────────────────────────

    /// Widgets in insertion order.
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Owned copy of the current widgets, for handing to another thread or the renderer.
    pub fn snapshot(&self) -> Vec<Widget> {
        self.widgets.clone()
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn widgets_on_page(&self, page: usize) -> impl Iterator<Item = &Widget> + '_ {
        self.widgets.iter().filter(move |w| w.position.page == page)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn geometry(&self) -> &GridGeometry {
        self.grid.geometry()
    }

    pub fn max_pages(&self) -> usize {
        self.grid.max_pages()
    }

    /// Pages the UI should show: every page up to the highest used one, plus one blank page to
    /// drop into. An empty layout has one page.
    pub fn page_count(&self) -> usize {
        self.widgets
            .iter()
            .map(|w| w.position.page)
            .max()
            .map_or(1, |highest| highest + 2)
    }

    /// Collision oracle over the committed widgets, for drag-preview highlighting.
    pub fn is_position_free(
        &self,
        size: SizeClass,
        position: Position,
        excluding: Option<WidgetId>,
    ) -> bool {
        is_free(&self.grid, size, position, excluding, &self.widgets)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LayoutEvent> {
        self.events.subscribe()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Mutating operations
    // ────────────────────────────────────────────────────────────────────────

    /// Places a new widget at the first free slot, preferring `request.page`.
    pub fn add_widget(&mut self, request: NewWidget) -> Result<WidgetId, LayoutError> {
        let kind = request.kind;
        let size = request.size.unwrap_or_else(|| kind.default_size());
        if !kind.supports(size) {
            return Err(LayoutError::InvalidSize { kind, size });
        }

        let Some(position) =
            find_free_position(&self.grid, size, request.page, None, &self.widgets)
        else {
            return Err(self.reject(NoSpaceContext::Add, size));
        };

        let id = WidgetId::new();
        self.widgets.push(Widget {
            id,
            kind,
            size,
            position,
            theme: request.theme,
        });
        debug!(id = %id, kind = %kind, size = %size, page = position.page, row = position.row, column = position.column, "Widget added");
        self.commit(LayoutEvent::Added { id, position });
        Ok(id)
    }

    /// Removes a widget. Unknown ids are a no-op and return `None`.
    pub fn remove_widget(&mut self, id: WidgetId) -> Option<Widget> {
        let index = self.index_of(id)?;
        let removed = self.widgets.remove(index);
        debug!(id = %id, "Widget removed");
        self.commit(LayoutEvent::Removed { id });
        Some(removed)
    }

    /// Changes a widget's size, in place if it fits there, otherwise at the first free slot
    /// starting from its current page.
    pub fn resize_widget(&mut self, id: WidgetId, size: SizeClass) -> Result<(), LayoutError> {
        let index = self.index_of(id).ok_or(LayoutError::UnknownWidget(id))?;
        let widget = &self.widgets[index];
        if !widget.kind.supports(size) {
            return Err(LayoutError::InvalidSize {
                kind: widget.kind,
                size,
            });
        }

        let current = widget.position;
        let position = if is_free(&self.grid, size, current, Some(id), &self.widgets) {
            current
        } else if let Some(position) =
            find_free_position(&self.grid, size, Some(current.page), Some(id), &self.widgets)
        {
            position
        } else {
            return Err(self.reject(NoSpaceContext::Resize, size));
        };

        let widget = &mut self.widgets[index];
        widget.size = size;
        widget.position = position;
        debug!(id = %id, size = %size, page = position.page, row = position.row, column = position.column, "Widget resized");
        self.commit(LayoutEvent::Resized { id, size, position });
        Ok(())
    }

    /// Moves a widget towards `requested`, clamped into the grid. If the clamped slot is taken,
    /// the nearest free slot wins. Returns where the widget ended up.
    pub fn move_widget(
        &mut self,
        id: WidgetId,
        requested: Position,
    ) -> Result<Position, LayoutError> {
        let index = self.index_of(id).ok_or(LayoutError::UnknownWidget(id))?;
        let size = self.widgets[index].size;
        let clamped = self.grid.clamp(size.cells(), requested);

        let position = if is_free(&self.grid, size, clamped, Some(id), &self.widgets) {
            clamped
        } else if let Some(position) =
            find_nearest_position(&self.grid, size, clamped, Some(id), &self.widgets)
        {
            position
        } else {
            return Err(self.reject(NoSpaceContext::Move, size));
        };

        self.widgets[index].position = position;
        debug!(id = %id, page = position.page, row = position.row, column = position.column, "Widget moved");
        self.commit(LayoutEvent::Moved { id, position });
        Ok(position)
    }

    /// Re-lays every widget out for a new geometry. A geometry equal to the current one
    /// (cell size within epsilon) is a no-op. Returns the ids of widgets that no longer fit.
    pub fn on_geometry_changed(&mut self, geometry: GridGeometry) -> Vec<WidgetId> {
        let old = *self.grid.geometry();
        if geometry == old {
            debug!("Grid geometry unchanged, no re-layout");
            return Vec::new();
        }

        info!(
            from_columns = old.columns(),
            from_rows = old.rows(),
            columns = geometry.columns(),
            rows = geometry.rows(),
            cell_size = geometry.cell_size(),
            "Grid geometry changed, re-laying out widgets"
        );

        let grid = self.grid.with_geometry(geometry);
        let Relayout { widgets, dropped } = relayout(&self.widgets, &old, &grid);
        if !dropped.is_empty() {
            warn!(
                dropped = dropped.len(),
                "Widgets dropped: new grid too small for the layout"
            );
        }

        self.grid = grid;
        self.widgets = widgets;
        self.commit(LayoutEvent::Relaid {
            columns: geometry.columns(),
            rows: geometry.rows(),
            dropped: dropped.clone(),
        });
        dropped
    }

    /// Derives the geometry for a new viewport and applies it. Errors only for a degenerate
    /// viewport, in which case nothing changes.
    pub fn on_viewport_changed(
        &mut self,
        width: f64,
        height: f64,
        device: DeviceClass,
    ) -> Result<Vec<WidgetId>, LayoutError> {
        let geometry = GridGeometry::for_device(width, height, device)?;
        Ok(self.on_geometry_changed(geometry))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ────────────────────────────────────────────────────────────────────────

    fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| w.id == id)
    }

    fn commit(&mut self, event: LayoutEvent) {
        debug_assert_eq!(validate(&self.grid, &self.widgets), Ok(()));
        self.persist();
        self.events.emit(event);
    }

    fn reject(&self, context: NoSpaceContext, size: SizeClass) -> LayoutError {
        let signal = NoSpace::new(context, size);
        warn!(context = %context, size = %size, "{}", signal.details);
        self.events.emit(LayoutEvent::NoSpace(signal.clone()));
        LayoutError::NoSpace(signal)
    }

    /// Best-effort write. Failures are logged; the in-memory state stays authoritative.
    fn persist(&self) {
        let result = encode_widgets(&self.widgets)
            .and_then(|bytes| self.store.save(&self.store_key, &bytes));
        if let Err(e) = result {
            warn!(key = %self.store_key, error = %e, "Failed to persist widgets");
        }
    }
}

fn load_widgets(grid: &Grid, store: &dyn WidgetStore, key: &str) -> Vec<Widget> {
    let bytes = match store.load(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!(key, "No stored widgets, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored widgets, starting empty");
            return Vec::new();
        }
    };

    match decode_widgets(&bytes) {
        Ok(decoded) => {
            let widgets = restore_widgets(grid, decoded);
            info!(key, count = widgets.len(), "Loaded stored widgets");
            widgets
        }
        Err(e) => {
            warn!(key, error = %e, "Stored widgets are corrupt, starting empty");
            Vec::new()
        }
    }
}
