//! Shared application state for axum handlers.

use std::sync::Arc;

use tally_app::engine::TallyEngine;
use tally_app::event_bus::InProcessEventBus;
use tally_app::ports::StateStore;

/// Application state shared across all axum handlers.
///
/// Generic over the state store to avoid dynamic dispatch. `Clone` is
/// implemented manually so the engine itself does not need to be `Clone` —
/// only the `Arc` wrappers are cloned.
pub struct AppState<S> {
    /// The engine every incoming event goes through.
    pub engine: Arc<TallyEngine<S, Arc<InProcessEventBus>>>,
    /// Direct read access to the persisted cells.
    pub store: S,
    /// Bus the engine republishes processed events on; SSE subscribes here.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<S: Clone> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            store: self.store.clone(),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<S> AppState<S>
where
    S: StateStore + Clone + Send + Sync + 'static,
{
    /// Create a new application state.
    pub fn new(
        engine: Arc<TallyEngine<S, Arc<InProcessEventBus>>>,
        store: S,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            engine,
            store,
            event_bus,
        }
    }
}
