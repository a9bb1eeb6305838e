use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::errors::LayoutError;
use crate::events::LayoutEvent;
use crate::layout::{DeviceClass, GridGeometry, LayoutEngine, NewWidget};
use crate::models::{Position, SizeClass, Widget, WidgetId};

/// Shared handle to one layout engine, cloned into every view that reads or edits the grid.
///
/// Each call holds the lock for the whole operation, so readers never see a half-applied
/// re-layout. A panic inside an operation cannot leave the collection half-mutated (every
/// operation commits last), so a poisoned lock is recovered rather than propagated.
#[derive(Debug, Clone)]
pub struct SharedLayout {
    inner: Arc<Mutex<LayoutEngine>>,
}

impl SharedLayout {
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LayoutEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the engine under the lock, for reads that need more than one accessor.
    pub fn with<R>(&self, f: impl FnOnce(&LayoutEngine) -> R) -> R {
        f(&self.lock())
    }

    pub fn add_widget(&self, request: NewWidget) -> Result<WidgetId, LayoutError> {
        self.lock().add_widget(request)
    }

    pub fn remove_widget(&self, id: WidgetId) -> Option<Widget> {
        self.lock().remove_widget(id)
    }

    pub fn resize_widget(&self, id: WidgetId, size: SizeClass) -> Result<(), LayoutError> {
        self.lock().resize_widget(id, size)
    }

    pub fn move_widget(&self, id: WidgetId, requested: Position) -> Result<Position, LayoutError> {
        self.lock().move_widget(id, requested)
    }

    pub fn on_geometry_changed(&self, geometry: GridGeometry) -> Vec<WidgetId> {
        self.lock().on_geometry_changed(geometry)
    }

    pub fn on_viewport_changed(
        &self,
        width: f64,
        height: f64,
        device: DeviceClass,
    ) -> Result<Vec<WidgetId>, LayoutError> {
        self.lock().on_viewport_changed(width, height, device)
    }

    pub fn snapshot(&self) -> Vec<Widget> {
        self.lock().snapshot()
    }

    pub fn widget(&self, id: WidgetId) -> Option<Widget> {
        self.lock().widget(id).cloned()
    }

    pub fn page_count(&self) -> usize {
        self.lock().page_count()
    }

    pub fn geometry(&self) -> GridGeometry {
        *self.lock().geometry()
    }

    pub fn is_position_free(
        &self,
        size: SizeClass,
        position: Position,
        excluding: Option<WidgetId>,
    ) -> bool {
        self.lock().is_position_free(size, position, excluding)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LayoutEvent> {
        self.lock().subscribe()
    }
}
